// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus CLI entrypoint.
//!
//! Headless protocol driver: NDJSON host messages on stdin, outbound panel
//! messages as NDJSON on stdout, logging on stderr. Intended for
//! integration-testing a host without a webview.

use std::error::Error;

use tokio::io::{AsyncBufReadExt, BufReader};

use proteus::format::DocumentDialect;
use proteus::protocol::{HostMessage, PanelConfig};
use proteus::session::FlowPanel;
use proteus::store::StateStore;
use proteus::surface::NullSurface;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--format <json|yaml>] [--base <path>] [--runtime-url <url>] [--token <token>] [--readonly]\n\nReads NDJSON host messages on stdin and writes outbound panel messages to stdout.\nLogging goes to stderr (RUST_LOG=proteus=debug)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    format: Option<String>,
    base: Option<String>,
    runtime_url: Option<String>,
    token: Option<String>,
    readonly: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--format" => {
                if options.format.is_some() {
                    return Err(());
                }
                options.format = Some(args.next().ok_or(())?);
            }
            "--base" => {
                if options.base.is_some() {
                    return Err(());
                }
                options.base = Some(args.next().ok_or(())?);
            }
            "--runtime-url" => {
                if options.runtime_url.is_some() {
                    return Err(());
                }
                options.runtime_url = Some(args.next().ok_or(())?);
            }
            "--token" => {
                if options.token.is_some() {
                    return Err(());
                }
                options.token = Some(args.next().ok_or(())?);
            }
            "--readonly" => {
                if options.readonly {
                    return Err(());
                }
                options.readonly = true;
            }
            _ => return Err(()),
        }
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();

        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "proteus".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let dialect = match options.format.as_deref() {
            None => DocumentDialect::default(),
            Some(raw) => raw.parse::<DocumentDialect>()?,
        };
        let config = PanelConfig {
            dialect,
            runtime_url: options.runtime_url,
            token: options.token,
        };

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        runtime.block_on(async move {
            let (mut panel, mut channels) =
                FlowPanel::new(Box::new(NullSurface), StateStore::new());
            panel.open_session(
                options.base.unwrap_or_default(),
                config,
                "",
                "untitled.flow",
                options.readonly,
            )?;

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                tokio::select! {
                    line = lines.next_line() => {
                        let Some(line) = line? else {
                            break;
                        };
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<HostMessage>(line) {
                            Ok(message) => panel.handle_message(message),
                            Err(err) => tracing::warn!(error = %err, "unreadable host message"),
                        }
                    }
                    Some(update) = channels.updates.recv() => {
                        panel.handle_enrichment(update);
                    }
                    Some(message) = channels.outbound.recv() => {
                        println!("{}", serde_json::to_string(&message)?);
                    }
                }
            }
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("proteus: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_all_flags() {
        let options = parse_options(
            [
                "--format", "yaml", "--base", "/projects", "--runtime-url",
                "http://127.0.0.1:9001", "--token", "sekrit", "--readonly",
            ]
            .map(str::to_owned)
            .into_iter(),
        )
        .expect("parse options");

        assert_eq!(options.format.as_deref(), Some("yaml"));
        assert_eq!(options.base.as_deref(), Some("/projects"));
        assert_eq!(options.runtime_url.as_deref(), Some("http://127.0.0.1:9001"));
        assert_eq!(options.token.as_deref(), Some("sekrit"));
        assert!(options.readonly);
    }

    #[test]
    fn rejects_unknown_args() {
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse_options(["--readonly".to_owned(), "--readonly".to_owned()].into_iter()).unwrap_err();

        parse_options(
            ["--format", "json", "--format", "yaml"].map(str::to_owned).into_iter(),
        )
        .unwrap_err();
    }

    #[test]
    fn rejects_missing_flag_values() {
        parse_options(["--token".to_owned()].into_iter()).unwrap_err();
    }
}

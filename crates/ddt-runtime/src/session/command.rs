//! Shell command grammar.

use ddt_01_record_ledger::{RecordDraft, RecordId};
use serde_json::Value;
use thiserror::Error;

pub const HELP_TEXT: &str = "\
connect <account>                          connect a wallet account
disconnect                                 disconnect the wallet
submit <patient> <drug> <dosage> [history] create a pending record
simulate <id>                              run the optimization simulation
reject <id>                                reject a pending record
refresh                                    reload the snapshot from the ledger
search [term]                              filter by drug or patient (empty clears)
list                                       show the filtered snapshot
show <id>                                  show one record
stats                                      status counts
chart                                      records per drug
reconcile                                  re-append ids dropped from the index
rpc <method> [json]                        call the JSON query handler
help                                       this text
quit                                       leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Connect(String),
    Disconnect,
    Submit(RecordDraft),
    Simulate(RecordId),
    Reject(RecordId),
    Refresh,
    Search(String),
    List,
    Show(RecordId),
    Stats,
    Chart,
    Reconcile,
    Rpc { method: String, params: Value },
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("invalid JSON params: {0}")]
    InvalidParams(String),
}

fn required<'a>(
    word: Option<&'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    word.ok_or(CommandError::MissingArgument { command, argument })
}

/// Parse one input line.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let mut words = rest.split_whitespace();

    let command = match verb.to_ascii_lowercase().as_str() {
        "" => return Err(CommandError::Empty),
        "connect" => Command::Connect(required(words.next(), "connect", "account")?.to_string()),
        "disconnect" => Command::Disconnect,
        "submit" => {
            let patient_id = required(words.next(), "submit", "patient")?.to_string();
            let drug_name = required(words.next(), "submit", "drug")?.to_string();
            let dosage = required(words.next(), "submit", "dosage")?.to_string();
            let medical_history = words.collect::<Vec<_>>().join(" ");
            Command::Submit(RecordDraft {
                patient_id,
                drug_name,
                dosage,
                medical_history,
            })
        }
        "simulate" => Command::Simulate(required(words.next(), "simulate", "id")?.into()),
        "reject" => Command::Reject(required(words.next(), "reject", "id")?.into()),
        "refresh" => Command::Refresh,
        "search" => Command::Search(rest.to_string()),
        "list" | "ls" => Command::List,
        "show" => Command::Show(required(words.next(), "show", "id")?.into()),
        "stats" => Command::Stats,
        "chart" => Command::Chart,
        "reconcile" => Command::Reconcile,
        "rpc" => {
            let (method, json) = match rest.split_once(char::is_whitespace) {
                Some((method, json)) => (method, json.trim()),
                None => (rest, ""),
            };
            if method.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "rpc",
                    argument: "method",
                });
            }
            let params = if json.is_empty() {
                Value::Object(Default::default())
            } else {
                serde_json::from_str(json).map_err(|e| CommandError::InvalidParams(e.to_string()))?
            };
            Command::Rpc {
                method: method.to_string(),
                params,
            }
        }
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

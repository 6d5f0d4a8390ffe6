//! Functions command - function listing.

use anyhow::Result;
use clap::{Args, Subcommand};

use aiengine_client::ListFunctionsQuery;

use super::groups::print_functions;
use super::{Context, print_json};

/// Arguments for the functions command.
#[derive(Args, Debug)]
pub struct FunctionsArgs {
    #[command(subcommand)]
    pub command: FunctionsCommand,
}

#[derive(Subcommand, Debug)]
pub enum FunctionsCommand {
    /// List your functions
    List {
        /// Query parameter as key=value (repeatable)
        #[arg(long = "query", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        query: Vec<(String, String)>,
    },

    /// List the groups a function belongs to
    Groups {
        /// Function ID
        id: String,
    },
}

/// Run the functions command.
pub async fn run(args: FunctionsArgs, ctx: &Context) -> Result<()> {
    let connected = ctx.connect()?;
    let functions = connected.client.functions();

    match args.command {
        FunctionsCommand::List { query } => {
            let query = query
                .into_iter()
                .fold(ListFunctionsQuery::new(), |q, (k, v)| q.param(k, v));
            let list = if query.is_empty() {
                functions.list().await?
            } else {
                functions.list_with_query(&query).await?
            };
            if ctx.json_output {
                print_json(&list)?;
            } else {
                print_functions(&list);
            }
        }
        FunctionsCommand::Groups { id } => {
            let groups = functions.groups(&id).await?;
            if ctx.json_output {
                print_json(&groups)?;
            } else {
                for group in &groups {
                    println!("{}  {}", group.uuid, group.name);
                }
            }
        }
    }

    Ok(())
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got \"{}\"", s))?;
    if key.is_empty() {
        return Err(format!("empty key in \"{}\"", s));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("type=PRIMARY").unwrap(),
            ("type".to_string(), "PRIMARY".to_string())
        );
        assert_eq!(
            parse_key_value("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }
}

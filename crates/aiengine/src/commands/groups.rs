//! Groups command - function group management.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use console::{Style, style};

use aiengine_client::{Function, FunctionGroup};

use super::display::{print_dim, print_success};
use super::{Context, print_json};

/// Arguments for the groups command.
#[derive(Args, Debug)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Subcommand, Debug)]
pub enum GroupsCommand {
    /// List visible function groups (private first)
    List {
        /// Only public groups
        #[arg(long, conflicts_with = "private")]
        public: bool,

        /// Only private groups
        #[arg(long)]
        private: bool,
    },

    /// Create a function group
    Create {
        /// Group name
        name: String,

        /// Make the group public
        #[arg(long)]
        public: bool,

        /// Share the new group with this email
        #[arg(long)]
        share_with: Option<String>,
    },

    /// Delete a function group
    Delete {
        /// Group ID
        id: String,
    },

    /// Grant another user read access to a group
    Share {
        /// Group ID
        id: String,

        /// Email of the user to share with
        #[arg(long, required_unless_present = "user_id")]
        email: Option<String>,

        /// ID of the user to share with
        #[arg(long)]
        user_id: Option<String>,
    },

    /// List the functions of a group
    Functions {
        /// Group ID
        id: String,
    },

    /// Find a group by exact name
    Find {
        /// Group name
        name: String,
    },
}

/// Run the groups command.
pub async fn run(args: GroupsArgs, ctx: &Context) -> Result<()> {
    let connected = ctx.connect()?;
    let groups = connected.client.function_groups();

    match args.command {
        GroupsCommand::List { public, private } => {
            let list = if public {
                groups.list_public().await?
            } else if private {
                groups.list_private().await?
            } else {
                groups.list().await?
            };
            if ctx.json_output {
                print_json(&list)?;
            } else {
                print_groups(&list);
            }
        }
        GroupsCommand::Create {
            name,
            public,
            share_with,
        } => {
            let group = match share_with {
                Some(email) => groups.create_and_share(name, !public, &email).await?,
                None => groups.create(name, !public).await?,
            };
            if ctx.json_output {
                print_json(&group)?;
            } else {
                print_success(&format!("Group created: {} ({})", group.name, group.uuid));
            }
        }
        GroupsCommand::Delete { id } => {
            groups.delete(&id).await?;
            if !ctx.json_output {
                print_success(&format!("Group deleted: {}", id));
            }
        }
        GroupsCommand::Share { id, email, user_id } => {
            let result = groups
                .share(&id, user_id.as_deref(), email.as_deref())
                .await?;
            if ctx.json_output {
                print_json(&result)?;
            } else {
                let target = email.or(user_id).unwrap_or_default();
                print_success(&format!("Group {} shared with {}", id, target));
            }
        }
        GroupsCommand::Functions { id } => {
            let functions = groups.functions(&id).await?;
            if ctx.json_output {
                print_json(&functions)?;
            } else {
                print_functions(&functions);
            }
        }
        GroupsCommand::Find { name } => match groups.find_by_name(&name).await? {
            Some(group) => {
                if ctx.json_output {
                    print_json(&group)?;
                } else {
                    print_groups(std::slice::from_ref(&group));
                }
            }
            None => bail!("no function group named \"{}\"", name),
        },
    }

    Ok(())
}

fn print_groups(groups: &[FunctionGroup]) {
    if groups.is_empty() {
        print_dim("No function groups.");
        return;
    }
    let dim = Style::new().dim();
    println!("{}", style(format!("{:<38} {:<10} NAME", "ID", "VISIBILITY")).bold());
    for group in groups {
        let visibility = if group.is_private { "private" } else { "public" };
        println!(
            "{:<38} {:<10} {}",
            dim.apply_to(&group.uuid),
            visibility,
            group.name
        );
    }
}

/// Print a function table.
pub fn print_functions(functions: &[Function]) {
    if functions.is_empty() {
        print_dim("No functions.");
        return;
    }
    let dim = Style::new().dim();
    for function in functions {
        println!(
            "{} {} {}",
            style(&function.name).bold(),
            dim.apply_to(&function.uuid),
            dim.apply_to(function.function_type.as_deref().unwrap_or(""))
        );
        if let Some(description) = &function.description {
            println!("    {}", description);
        }
    }
}

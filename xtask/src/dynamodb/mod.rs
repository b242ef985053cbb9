//! DynamoDB infrastructure management commands.

mod client;
mod config;
mod deploy;
mod error;
mod planning;

pub use error::{DynamodbError, Result};

use crate::prelude::*;
use dialoguer::Confirm;

/// DynamoDB infrastructure management commands.
#[derive(Debug, clap::Parser)]
pub struct DynamodbCommand {
    #[command(subcommand)]
    pub action: DynamodbAction,
}

/// Available DynamoDB actions.
#[derive(Debug, clap::Subcommand)]
pub enum DynamodbAction {
    /// Deploy or destroy the plays table.
    Deploy(DeployCommand),
}

/// Deploy or destroy the plays table.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Deploy or destroy the plays DynamoDB table.

By default, this command creates the table holding plays: a single string
hash key `id`, no range key, on-demand billing.

The command shows a plan of changes before applying and asks for confirmation.
An existing table with a different key schema is reported and left untouched.

Environment variables:
  DYNAMODB_ENDPOINT   - Use local DynamoDB (e.g., http://localhost:8000)
  AWS_ENDPOINT_URL    - Fallback for DYNAMODB_ENDPOINT
  AWS_REGION          - AWS region (defaults to us-east-1)
  AWS_PROFILE         - AWS profile to use for credentials")]
pub struct DeployCommand {
    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,

    /// Destroy the table instead of creating it.
    #[arg(long)]
    pub destroy: bool,

    /// Table name to use.
    #[arg(long, env = "PLAYS_TABLE_NAME", default_value = "Plays")]
    pub table_name: String,
}

/// Main entry point for dynamodb command.
pub async fn run(command: DynamodbCommand, global: crate::Global) -> Result<()> {
    match command.action {
        DynamodbAction::Deploy(deploy_cmd) => run_deploy(deploy_cmd, &global).await,
    }
}

async fn run_deploy(cmd: DeployCommand, global: &crate::Global) -> Result<()> {
    let aws_config = client::AwsConfig::default();

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aprintln!();
    }

    let dynamo_client = client::create_client(&aws_config).await;
    let current_state = client::get_table_state(&dynamo_client, &cmd.table_name).await?;

    if cmd.destroy {
        run_destroy(&cmd, global, &dynamo_client, current_state.as_ref()).await
    } else {
        run_create(&cmd, global, &dynamo_client, current_state.as_ref()).await
    }
}

async fn run_destroy(
    cmd: &DeployCommand,
    global: &crate::Global,
    dynamo_client: &aws_sdk_dynamodb::Client,
    current_state: Option<&planning::TableState>,
) -> Result<()> {
    let plan = planning::calculate_destroy_plan(current_state, &cmd.table_name);

    if !global.is_silent() {
        aprintln!("{}", p_y("Destroy Plan:"));
        for line in planning::format_destroy_plan(&plan) {
            aprintln!("  {}", p_r(&line));
        }
        aprintln!();
    }

    if matches!(plan, planning::DestroyPlan::AlreadyGone { .. }) {
        if !global.is_silent() {
            aprintln!("{}", p_g("Nothing to destroy."));
        }
        return Ok(());
    }

    if !cmd.force {
        let confirmed = Confirm::new()
            .with_prompt("Are you sure you want to delete this table? ALL PLAYS WILL BE LOST")
            .default(false)
            .interact()?;

        if !confirmed {
            return Err(DynamodbError::UserCancelled);
        }
    }

    if !global.is_silent() {
        aprintln!("{}", p_b("Deleting table..."));
    }

    deploy::execute_destroy_plan(dynamo_client, &plan).await?;

    if !global.is_silent() {
        aprintln!("{}", p_g("Table destroyed successfully."));
    }

    Ok(())
}

async fn run_create(
    cmd: &DeployCommand,
    global: &crate::Global,
    dynamo_client: &aws_sdk_dynamodb::Client,
    current_state: Option<&planning::TableState>,
) -> Result<()> {
    let table_config = config::plays_table_config().with_table_name(&cmd.table_name);

    let plan = planning::calculate_deploy_plan(current_state, &table_config);

    if !global.is_silent() {
        aprintln!("{}", p_c("Deploy Plan:"));
        for line in planning::format_deploy_plan(&plan) {
            if line.starts_with('+') {
                aprintln!("  {}", p_g(&line));
            } else if line.starts_with('-') {
                aprintln!("  {}", p_r(&line));
            } else if line.starts_with('~') {
                aprintln!("  {}", p_y(&line));
            } else {
                aprintln!("  {}", line);
            }
        }
        aprintln!();
    }

    match plan {
        planning::DeployPlan::NoChanges { .. } => {
            if !global.is_silent() {
                aprintln!("{}", p_g("Infrastructure is up to date."));
            }
            return Ok(());
        }
        // Fails without prompting; deploy cannot repair either case.
        planning::DeployPlan::KeySchemaMismatch { .. }
        | planning::DeployPlan::TableUnusable { .. } => {
            return deploy::execute_deploy_plan(dynamo_client, &plan).await;
        }
        planning::DeployPlan::CreateTable { .. } => {}
    }

    if !cmd.force {
        let confirmed = Confirm::new()
            .with_prompt("Apply these changes?")
            .default(true)
            .interact()?;

        if !confirmed {
            return Err(DynamodbError::UserCancelled);
        }
    }

    if !global.is_silent() {
        aprintln!("{}", p_b("Creating table and waiting for it to become active..."));
    }

    deploy::execute_deploy_plan(dynamo_client, &plan).await?;

    if !global.is_silent() {
        aprintln!("{}", p_g("Infrastructure deployed successfully."));
    }

    Ok(())
}

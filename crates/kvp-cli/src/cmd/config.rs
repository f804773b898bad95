use crate::output::print_json;
use crate::RunContext;
use clap::Subcommand;
use kvp_core::config::WarnLevel;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(ctx: &RunContext, subcmd: ConfigSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(ctx),
        ConfigSubcommand::Validate => validate(ctx),
    }
}

fn show(ctx: &RunContext) -> anyhow::Result<()> {
    if ctx.json {
        return print_json(&ctx.config);
    }
    print!("{}", serde_yaml::to_string(&ctx.config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(ctx: &RunContext) -> anyhow::Result<()> {
    let warnings = ctx.config.validate();

    if ctx.json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}

use chrono_tz::Tz;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{write_config, RollcallConfig, DEFAULT_BASE_URL};
use crate::errors::CliError;
use crate::helpers::parse_date;
use crate::ui::{hint, print, receipt};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let path = resolve_config_path(ctx.cli())?;
    if path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists: {} (pass --force to overwrite)",
            path.display()
        ))
        .into());
    }

    let base_url = ctx
        .cli()
        .server
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let min_date = args.min_date.as_deref().map(parse_date).transpose()?;
    if let Some(tz) = args.timezone.as_deref() {
        tz.parse::<Tz>()
            .map_err(|_| CliError::invalid_input(format!("Unknown timezone: {}", tz)))?;
    }

    let config = RollcallConfig::new(
        base_url.clone(),
        min_date,
        args.timezone.clone(),
        args.csrf_header.clone(),
    );
    write_config(&path, &config)?;
    tracing::info!(path = %path.display(), "config written");

    if ctx.quiet() {
        return Ok(());
    }

    let ui_ctx = ctx.ui_context(false, None);
    let path_display = path.display().to_string();
    let min_display = config
        .attendance
        .min_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "server default".to_string());
    print(
        &ui_ctx,
        &receipt(
            &ui_ctx,
            "Config written",
            &[
                ("Path", path_display.as_str()),
                ("Server", base_url.as_str()),
                ("Min date", min_display.as_str()),
                ("CSRF header", config.csrf.header.as_str()),
            ],
        ),
    );
    print(
        &ui_ctx,
        &hint(
            &ui_ctx,
            "Set ROLLCALL_CSRF_TOKEN and [server] session_cookie before saving.",
        ),
    );
    Ok(())
}

use tracing_subscriber::EnvFilter;

/// Windowing and rendering crates that log every frame at debug level.
const QUIET_TARGETS: &[&str] = &["eframe", "egui_glow", "egui_winit", "winit"];

/// Filter directives for the dashboard. Only this crate is raised to `debug`;
/// the windowing backends stay at `warn` either way.
pub fn directives(debug: bool) -> String {
    let own = if debug { "debug" } else { "info" };
    let mut directives = vec![format!("warn,{}={own}", env!("CARGO_CRATE_NAME"))];
    directives.extend(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")));
    directives.join(",")
}

/// Install the global subscriber. `RUST_LOG` is honoured only with debug
/// logging enabled in the settings.
pub fn init(debug: bool) {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(raw) if debug && !raw.trim().is_empty() => EnvFilter::try_new(&raw).unwrap_or_else(|e| {
            eprintln!("ignoring invalid {}: {e}", EnvFilter::DEFAULT_ENV);
            EnvFilter::new(directives(debug))
        }),
        _ => EnvFilter::new(directives(debug)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_keep_crate_at_info() {
        let d = directives(false);
        assert!(d.starts_with("warn,console_dashboard=info"));
        assert!(d.contains("egui_glow=warn"));
    }

    #[test]
    fn debug_directives_only_raise_this_crate() {
        let d = directives(true);
        assert!(d.contains("console_dashboard=debug"));
        assert!(!d.contains("eframe=debug"));
        assert!(EnvFilter::try_new(&d).is_ok());
    }
}

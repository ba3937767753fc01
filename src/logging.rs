use tracing_subscriber::EnvFilter;

pub fn init_tracing(component: &str) {
    init_tracing_with_default(&format!(
        "info,just_begin=debug,{component}=debug,tower_http=info"
    ));
}

/// `JUST_BEGIN_LOG` wins over `RUST_LOG`, which wins over `default_filter`.
pub fn init_tracing_with_default(default_filter: &str) {
    let filter = std::env::var("JUST_BEGIN_LOG")
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init();
}

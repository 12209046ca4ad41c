use crate::certificate::assembler::DocumentAssembler;
use crate::config::Config;
use crate::layout::FitParams;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    /// Fitting knobs derived from `config`; shared by preview and generation.
    pub fit_params: FitParams,
    pub assembler: DocumentAssembler,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let fit_params = config.fit_params();
        let assembler =
            DocumentAssembler::new(fit_params).with_max_backdrop_bytes(config.max_backdrop_bytes);
        AppState {
            config,
            fit_params,
            assembler,
        }
    }
}

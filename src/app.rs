//! Application entry point for UI shells.
//!
//! A shell builds one `Tracker` at startup with an explicit configuration,
//! then calls `on_fetch_requested` whenever the user asks for a region. The
//! tracker drives the shell's `SnowfallView` through the loading, ranked and
//! error states.

use crate::aliases::AliasTable;
use crate::config::TrackerConfig;
use crate::ingest::{ReqwestTransport, Transport, TransportError};
use crate::model::{RankedResult, TrackerError};
use crate::pipeline::Pipeline;
use crate::render::PresentationState;

/// Something that can display tracker states.
pub trait SnowfallView {
    fn show(&mut self, state: &PresentationState);
}

/// A configured tracker bound to one transport.
pub struct Tracker {
    config: TrackerConfig,
    transport: Box<dyn Transport>,
    aliases: AliasTable,
}

impl Tracker {
    pub fn new(config: TrackerConfig, transport: Box<dyn Transport>) -> Self {
        Tracker {
            config,
            transport,
            aliases: AliasTable::builtin(),
        }
    }

    /// Builds a tracker that talks to the AWDB API over HTTP.
    pub fn start(config: TrackerConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Ok(Tracker::new(config, Box::new(transport)))
    }

    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(self.transport.as_ref(), &self.config, self.aliases)
    }

    /// Runs the pipeline for `region_key` without touching any view.
    pub async fn run(&self, region_key: &str) -> Result<RankedResult, TrackerError> {
        self.pipeline().run(region_key).await
    }

    /// Handles the shell's fetch trigger.
    ///
    /// With no region selected the view is asked to prompt for one and no
    /// request is made. Otherwise the view sees `Loading` followed by either
    /// `Ranked` or `Error`.
    pub async fn on_fetch_requested(
        &self,
        region_key: Option<&str>,
        view: &mut dyn SnowfallView,
    ) -> Option<RankedResult> {
        let Some(region_key) = region_key.map(str::trim).filter(|k| !k.is_empty()) else {
            view.show(&PresentationState::NeedsRegion);
            return None;
        };

        view.show(&PresentationState::Loading);
        match self.run(region_key).await {
            Ok(result) => {
                view.show(&PresentationState::Ranked(result.clone()));
                Some(result)
            }
            Err(err) => {
                view.show(&PresentationState::Error(err.to_string()));
                None
            }
        }
    }
}

use std::ops::{Deref, DerefMut};

use super::{AnalysisEngine, EngineError};

/// an engine with its extension checked out. the extension is checked back
/// in when the session is dropped, whether the run succeeded or not.
pub struct EngineSession<'a, E: AnalysisEngine + ?Sized> {
    engine: &'a mut E,
    extension: String,
}

impl<'a, E: AnalysisEngine + ?Sized> EngineSession<'a, E> {
    pub fn open(engine: &'a mut E, extension: &str) -> Result<Self, EngineError> {
        engine.check_out_extension(extension)?;
        log::debug!("checked out extension '{extension}'");
        Ok(Self {
            engine,
            extension: extension.to_string(),
        })
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl<E: AnalysisEngine + ?Sized> Deref for EngineSession<'_, E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        self.engine
    }
}

impl<E: AnalysisEngine + ?Sized> DerefMut for EngineSession<'_, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.engine
    }
}

impl<E: AnalysisEngine + ?Sized> Drop for EngineSession<'_, E> {
    fn drop(&mut self) {
        match self.engine.check_in_extension(&self.extension) {
            Ok(()) => log::debug!("checked in extension '{}'", self.extension),
            Err(e) => log::warn!("failure checking in extension '{}': {e}", self.extension),
        }
    }
}

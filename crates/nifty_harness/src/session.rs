//! Execution sessions.

use crate::{AliasOverrides, HarnessError, Result, SessionConfig};
use nifty_core::Tuple;
use tracing::info;

/// Outcome of registering a script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    /// Alias of the last `STORE` statement, if the script stores anything
    pub last_store_alias: Option<String>,
}

/// The engine that runs scripts.
///
/// Implementations receive fully substituted script text; parameter
/// handling and input staging decisions belong to the caller.
pub trait ExecutionEngine {
    /// Starts the engine.
    fn start(&mut self, config: &SessionConfig) -> Result<()>;

    /// Stops the engine. Called once, on release.
    fn stop(&mut self);

    /// Registers `script`, applying `overrides` to its statements.
    fn register_script(&mut self, script: &str, overrides: &AliasOverrides)
    -> Result<Registration>;

    /// Returns the schema of `alias` in the registered script, e.g.
    /// `(id:chararray,name:chararray)`.
    fn dump_schema(&self, alias: &str) -> Result<String>;

    /// Stores `rows` somewhere a `LOAD` can read them and returns that location.
    fn stage(&mut self, rows: &[String]) -> Result<String>;

    /// Runs the registered script as needed and iterates the tuples of `alias`.
    fn open_iterator(&mut self, alias: &str) -> Result<Box<dyn Iterator<Item = Tuple> + '_>>;
}

/// An acquired execution engine.
///
/// Script operations borrow the session mutably. After [`release`](Self::release)
/// every operation fails with [`HarnessError::SessionReleased`].
pub struct Session {
    config: SessionConfig,
    engine: Option<Box<dyn ExecutionEngine>>,
}

impl Session {
    /// Starts `engine` with `config`.
    pub fn acquire(config: SessionConfig, engine: impl ExecutionEngine + 'static) -> Result<Self> {
        let mut engine: Box<dyn ExecutionEngine> = Box::new(engine);

        match config.exec_type {
            crate::ExecType::Cluster => info!("Using cluster mode"),
            crate::ExecType::Local => info!("Using default local mode"),
        }
        engine.start(&config)?;

        Ok(Self {
            config,
            engine: Some(engine),
        })
    }

    /// Stops the engine. Releasing twice is a no-op.
    pub fn release(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.stop();
            info!("Execution session released");
        }
    }

    /// Returns true until the session is released.
    pub fn is_active(&self) -> bool {
        self.engine.is_some()
    }

    /// Returns the configuration the session was acquired with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the engine.
    pub fn engine(&mut self) -> Result<&mut Box<dyn ExecutionEngine>> {
        self.engine.as_mut().ok_or(HarnessError::SessionReleased)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingEngine {
        stops: Arc<AtomicUsize>,
    }

    impl ExecutionEngine for CountingEngine {
        fn start(&mut self, _config: &SessionConfig) -> Result<()> {
            Ok(())
        }

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }

        fn register_script(&mut self, _: &str, _: &AliasOverrides) -> Result<Registration> {
            Ok(Registration::default())
        }

        fn dump_schema(&self, alias: &str) -> Result<String> {
            Err(HarnessError::UnknownAlias(alias.to_string()))
        }

        fn stage(&mut self, _rows: &[String]) -> Result<String> {
            Ok("nowhere".to_string())
        }

        fn open_iterator(&mut self, _: &str) -> Result<Box<dyn Iterator<Item = Tuple> + '_>> {
            Ok(Box::new(std::iter::empty()))
        }
    }

    #[test]
    fn test_release_stops_once() {
        let stops = Arc::new(AtomicUsize::new(0));
        let engine = CountingEngine {
            stops: Arc::clone(&stops),
        };

        let mut session = Session::acquire(SessionConfig::default(), engine).unwrap();
        assert!(session.is_active());

        session.release();
        session.release();
        drop(session);

        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_operations_fail_after_release() {
        let mut session =
            Session::acquire(SessionConfig::default(), CountingEngine::default()).unwrap();
        assert!(session.engine().is_ok());

        session.release();
        assert!(!session.is_active());
        assert!(matches!(
            session.engine(),
            Err(HarnessError::SessionReleased)
        ));
    }

    #[test]
    fn test_drop_releases() {
        let stops = Arc::new(AtomicUsize::new(0));
        {
            let _session = Session::acquire(
                SessionConfig::default(),
                CountingEngine {
                    stops: Arc::clone(&stops),
                },
            )
            .unwrap();
        }
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_start_yields_no_session() {
        struct Broken;

        impl ExecutionEngine for Broken {
            fn start(&mut self, _: &SessionConfig) -> Result<()> {
                Err(HarnessError::engine("cannot start"))
            }
            fn stop(&mut self) {}
            fn register_script(&mut self, _: &str, _: &AliasOverrides) -> Result<Registration> {
                Ok(Registration::default())
            }
            fn dump_schema(&self, _: &str) -> Result<String> {
                Ok(String::new())
            }
            fn stage(&mut self, _: &[String]) -> Result<String> {
                Ok(String::new())
            }
            fn open_iterator(&mut self, _: &str) -> Result<Box<dyn Iterator<Item = Tuple> + '_>> {
                Ok(Box::new(std::iter::empty()))
            }
        }

        let result = Session::acquire(SessionConfig::default(), Broken);
        assert!(matches!(result.unwrap_err(), HarnessError::Engine(_)));
    }
}

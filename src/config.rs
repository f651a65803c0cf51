use std::{error::Error, fs::read_to_string, path::Path};

use serde::Deserialize;

mod default_fns;

use default_fns::*;

/// Numeric controls for the Marquardt solver. Every field has a default, so
/// a config file only needs the entries it wants to override.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Initial value of the Marquardt damping parameter
    #[serde(default = "default_lmstart")]
    pub lmstart: f64,

    /// Factor by which the damping parameter is shrunk after an accepted
    /// step or grown after a rejected one
    #[serde(default = "default_lmstep")]
    pub lmstep: f64,

    /// Maximum number of damping values tried per iteration before the
    /// search is declared stagnated
    #[serde(default = "default_maxsteps")]
    pub maxsteps: usize,

    /// Maximum number of outer iterations
    #[serde(default = "default_maxit")]
    pub maxit: usize,

    /// Relative decrease of the goal function below which the solver is
    /// considered converged
    #[serde(default = "default_tol")]
    pub tol: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lmstart: default_lmstart(),
            lmstep: default_lmstep(),
            maxsteps: default_maxsteps(),
            maxit: default_maxit(),
            tol: default_tol(),
        }
    }
}

impl Config {
    pub fn load<P>(path: P) -> Result<Self, Box<dyn Error>>
    where
        P: AsRef<Path>,
    {
        let contents = read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.lmstart, 100.0);
        assert_eq!(config.lmstep, 10.0);
        assert_eq!(config.maxsteps, 20);
        assert_eq!(config.maxit, 100);
        assert_eq!(config.tol, 1e-5);
    }

    #[test]
    fn test_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lmstart = 1.0\nmaxit = 30").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.lmstart, 1.0);
        assert_eq!(config.maxit, 30);
        // everything else falls back to the defaults
        assert_eq!(config.lmstep, 10.0);
        assert_eq!(config.maxsteps, 20);
        assert_eq!(config.tol, 1e-5);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load("no/such/file.toml").is_err());
    }
}

//! Congestion scoring through an external process.

use futures::future::BoxFuture;
use rush_core::{parse_score_output, PredictionFailure, PredictionInput, Predictor};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::config::Config;

/// Runs `<program> [script] area road weather roadwork [date]` and reads a
/// single number from stdout.
#[derive(Debug, Clone)]
pub struct SubprocessPredictor {
    program: String,
    script: Option<String>,
    timeout: Duration,
}

impl SubprocessPredictor {
    pub fn new(program: impl Into<String>, script: Option<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            script,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.python_path.clone(),
            config.predict_script.clone(),
            config.predict_timeout,
        )
    }

    fn command(&self, input: &PredictionInput) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(script) = &self.script {
            command.arg(script);
        }
        command
            .args(input.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    async fn run(&self, input: &PredictionInput) -> Result<f64, PredictionFailure> {
        let child = self
            .command(input)
            .spawn()
            .map_err(|err| PredictionFailure::Spawn(format!("{}: {}", self.program, err)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| PredictionFailure::Timeout)?
            .map_err(|err| PredictionFailure::Spawn(err.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            tracing::error!(
                "Prediction process failed ({:?}): {}",
                output.status.code(),
                stderr.trim()
            );
            return Err(PredictionFailure::Exit {
                code: output.status.code(),
                stderr: stderr.into_owned(),
            });
        }

        parse_score_output(&stdout, &stderr)
    }
}

impl Predictor for SubprocessPredictor {
    fn predict<'a>(
        &'a self,
        input: &'a PredictionInput,
    ) -> BoxFuture<'a, Result<f64, PredictionFailure>> {
        Box::pin(self.run(input))
    }
}

//! Pipeline driver: lex, parse, render, and aggregate errors per [`Mode`].

use std::path::Path;

use envsubst_eval::{Context, Env};
use envsubst_types::{Mode, Restrictions, SubstError, SubstResult};

use crate::bytes::ByteEscape;
use crate::error::{Error, Result};

/// Substitutes variables from an owned [`Env`] under fixed restrictions.
///
/// The store stays writable through [`Substituter::env_mut`]; values set
/// there are seen by the next call.
#[derive(Debug, Clone)]
pub struct Substituter {
    /// Template name used in diagnostics.
    name: String,
    env: Env,
    restrictions: Restrictions,
}

impl Substituter {
    /// Create a substituter. `restrictions` are normalized, so `keep_unset`
    /// always wins over the failure flags.
    pub fn new(name: impl Into<String>, env: Env, restrictions: Restrictions) -> Self {
        Self {
            name: name.into(),
            env,
            restrictions: restrictions.normalized(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Env {
        &mut self.env
    }

    pub fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    /// Substitute variables into `input`.
    ///
    /// In [`Mode::Quick`] the first failure is returned and partial output is
    /// discarded. In [`Mode::AllErrors`] every node is rendered and all
    /// failures are returned together, in node order. A failing nested
    /// default counts as a failure of its enclosing expansion. Scan failures
    /// end the pass immediately in either mode.
    pub fn substitute(&self, input: &str) -> SubstResult<String> {
        let mode = self.restrictions.mode;
        tracing::debug!(template = %self.name, len = input.len(), ?mode, "substitution started");

        let ctx = Context::new(&self.env, &self.restrictions);
        let nodes = envsubst_parser::parse(input, ctx).inspect_err(|err| {
            tracing::debug!(template = %self.name, %err, "parse failed");
        })?;

        let mut out = String::with_capacity(input.len());
        let mut errors = Vec::new();
        for node in &nodes {
            match node.render(&ctx) {
                Ok(text) => out.push_str(&text),
                Err(err) if mode == Mode::Quick => return Err(err),
                Err(err) => errors.push(err),
            }
        }

        tracing::debug!(
            template = %self.name,
            nodes = nodes.len(),
            errors = errors.len(),
            "substitution finished"
        );
        match SubstError::collect(errors) {
            Some(err) => Err(err),
            None => Ok(out),
        }
    }

    /// Substitute variables into bytes.
    ///
    /// Byte sequences that are not valid UTF-8 are copied to the output
    /// unchanged, wherever they appear in the template.
    pub fn substitute_bytes(&self, input: &[u8]) -> Result<Vec<u8>> {
        let utf8_error = match std::str::from_utf8(input) {
            Ok(text) => return Ok(self.substitute(text)?.into_bytes()),
            Err(err) => err,
        };
        let Some(escape) = ByteEscape::for_input(input, &self.env) else {
            return Err(Error::Utf8(utf8_error));
        };
        tracing::debug!(template = %self.name, "input is not UTF-8, escaping invalid bytes");
        let text = self.substitute(&escape.decode(input))?;
        Ok(escape.encode(&text))
    }

    /// Read `path` and substitute variables into its contents.
    pub fn substitute_file(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        self.substitute_bytes(&bytes)
    }
}

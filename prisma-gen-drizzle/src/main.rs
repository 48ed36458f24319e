//! prisma-gen-drizzle
//!
//! Generator plugin: reads a JSON request on stdin, writes the generated
//! files as a JSON response on stdout. Logs go to stderr.
//!
//! Usage:
//!   prisma-gen-drizzle < request.json > response.json

#![deny(warnings)]
#![deny(missing_docs)]

use std::io::{self, Read, Write};

use prisma_gen_drizzle::{GenerateResponse, generate_from_bytes};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    // Read the request from stdin
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;

    // Generation failures are reported in the response, not as an exit status
    let response = match generate_from_bytes(&input) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "generation failed");
            GenerateResponse::from_error(&e)
        }
    };

    // Write the response to stdout
    let output = serde_json::to_vec(&response)?;
    io::stdout().write_all(&output)?;

    Ok(())
}

//! `soliton-gen serve`: run the HTTP API.

use std::net::{SocketAddr, ToSocketAddrs};

use tracing::info;

use soliton_gen_server::{AppState, serve};

use super::Context;
use crate::{
    cli::ServeArgs,
    error::{CliError, CliResult},
};

pub fn execute(args: ServeArgs, ctx: &Context) -> CliResult<()> {
    let host = args.host.unwrap_or_else(|| ctx.config.server.host.clone());
    let port = args.port.unwrap_or(ctx.config.server.port);
    let addr = resolve(&host, port)?;

    let state = AppState::new(ctx.ports()?, ctx.start_dir())
        .with_module_prefix(ctx.config.project.module_prefix.clone());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Server(format!("failed to start runtime: {e}")))?;

    ctx.output.info(&format!("Listening on http://{addr}"))?;
    runtime
        .block_on(serve(addr, state))
        .map_err(|e| CliError::Server(e.to_string()))?;
    info!("Server stopped");
    Ok(())
}

fn resolve(host: &str, port: u16) -> CliResult<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| CliError::InvalidInput {
            message: format!("invalid address {host}:{port}: {e}"),
        })?
        .next()
        .ok_or_else(|| CliError::InvalidInput {
            message: format!("{host}:{port} did not resolve to an address"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_loopback() {
        let addr = resolve("127.0.0.1", 3000).unwrap();
        assert_eq!(addr.port(), 3000);
        assert!(addr.ip().is_loopback());
    }
}

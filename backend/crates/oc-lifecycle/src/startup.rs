//! Start phase: resolve, spawn, discover, wait for health, publish.

use crate::{
    BinaryResolver, EXPORT_CACHE_ADDRESS, HealthChecker, LaunchSpec, LifecycleResult,
    OUTPUT_CACHE_ADDRESS, OUTPUT_CACHE_ENDPOINT, OUTPUT_CACHE_SOCKET, OUTPUT_VERSION,
    ProcessLauncher, Publisher, SIDECAR_SUBCOMMAND, STATE_HOST, SidecarEnv, StateStore, address,
    log_reader,
};

use std::path::{Path, PathBuf};

use log::{info, warn};
use oc_config::Config;

const SOCKET_DIR: &str = ".cirruslabs";
const SOCKET_FILENAME: &str = "omni-cache.sock";

/// Where the winning address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSource {
    /// Announced by the sidecar in its log
    Log,
    /// The caller's requested host
    Config,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub address: String,
    pub source: AddressSource,
}

/// What the start phase hands back to the job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupOutputs {
    pub pid: u32,
    pub address: Option<ResolvedAddress>,
    pub socket_path: Option<PathBuf>,
    pub resolved_version: String,
}

/// `<home>/.cirruslabs/omni-cache.sock`. The sidecar binds it; we never create it.
pub fn socket_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(SOCKET_DIR).join(SOCKET_FILENAME))
}

/// Log-derived address if present, else the normalized configured host.
pub fn choose_address(discovered: Option<&str>, configured_host: &str) -> Option<ResolvedAddress> {
    if let Some(addr) = discovered.map(address::normalize).filter(|a| !a.is_empty()) {
        return Some(ResolvedAddress {
            address: addr,
            source: AddressSource::Log,
        });
    }

    let fallback = address::normalize(configured_host);
    (!fallback.is_empty()).then_some(ResolvedAddress {
        address: fallback,
        source: AddressSource::Config,
    })
}

pub struct StartupCoordinator<'a> {
    config: &'a Config,
    resolver: &'a dyn BinaryResolver,
    launcher: &'a dyn ProcessLauncher,
    state: &'a mut dyn StateStore,
    publisher: &'a mut dyn Publisher,
}

impl<'a> StartupCoordinator<'a> {
    pub fn new(
        config: &'a Config,
        resolver: &'a dyn BinaryResolver,
        launcher: &'a dyn ProcessLauncher,
        state: &'a mut dyn StateStore,
        publisher: &'a mut dyn Publisher,
    ) -> Self {
        Self {
            config,
            resolver,
            launcher,
            state,
            publisher,
        }
    }

    /// Run the start phase once.
    ///
    /// Any error ends the phase. State saved before the failure stays saved
    /// so the stop phase can still find and stop the process.
    pub async fn start(&mut self) -> LifecycleResult<StartupOutputs> {
        let config = self.config;
        let sidecar = &config.sidecar;
        info!("Setting up omni-cache {}...", sidecar.version);

        let binary = self.resolver.resolve(&sidecar.version).await?;

        let spec = LaunchSpec {
            program: binary.path.clone(),
            args: vec![SIDECAR_SUBCOMMAND.to_string()],
            env: SidecarEnv::from_config(sidecar),
            log_file: config.paths.log_file_path(),
        };

        info!("Starting omni-cache sidecar...");
        let handle = self.launcher.launch(&spec)?;
        handle.persist(self.state)?;
        info!("omni-cache started with PID {}", handle.pid);

        let discovered = self.discover_address(&handle.log_file).await;
        if discovered.is_none() {
            warn!(
                "Could not find omni-cache listen address in {}, using configured host {}",
                handle.log_file.display(),
                sidecar.host
            );
        }

        let resolved = choose_address(discovered.as_deref(), &sidecar.host);
        match resolved {
            Some(ref r) => self.state.save(STATE_HOST, &r.address)?,
            None => warn!("No omni-cache address could be determined"),
        }

        let probe_target = resolved
            .as_ref()
            .map(|r| r.address.as_str())
            .unwrap_or(sidecar.host.as_str());
        let mut checker = HealthChecker::new(probe_target, config.health.request_timeout())?;
        info!("Waiting for omni-cache at {}", checker.url());

        if let Err(e) = checker
            .wait_healthy(config.health.attempts, config.health.delay())
            .await
        {
            log_reader::display_logs(&handle.log_file, "omni-cache logs", self.publisher).await;
            return Err(e);
        }

        let socket = socket_path();
        self.publish(&binary.version, resolved.as_ref(), socket.as_deref(), &binary.path)?;

        Ok(StartupOutputs {
            pid: handle.pid,
            address: resolved,
            socket_path: socket,
            resolved_version: binary.version,
        })
    }

    /// Re-read the log until it announces an address or attempts run out.
    async fn discover_address(&self, log_file: &Path) -> Option<String> {
        let discovery = &self.config.discovery;

        for attempt in 1..=discovery.attempts {
            let text = log_reader::read_log(log_file).await;
            if let Some(addr) = log_reader::extract_address(&text, &discovery.marker) {
                info!("omni-cache announced address {addr} (attempt {attempt})");
                return Some(addr);
            }

            if attempt < discovery.attempts {
                tokio::time::sleep(discovery.delay()).await;
            }
        }

        None
    }

    fn publish(
        &mut self,
        version: &str,
        resolved: Option<&ResolvedAddress>,
        socket: Option<&Path>,
        binary_path: &Path,
    ) -> LifecycleResult<()> {
        self.publisher.set_output(OUTPUT_VERSION, version)?;

        if let Some(dir) = binary_path.parent() {
            self.publisher.add_path(dir)?;
        }

        match resolved {
            Some(r) => {
                let endpoint = address::http_base(&r.address);
                self.publisher.set_output(OUTPUT_CACHE_ADDRESS, &r.address)?;
                self.publisher.set_output(OUTPUT_CACHE_ENDPOINT, &endpoint)?;
                self.publisher
                    .export_variable(EXPORT_CACHE_ADDRESS, &r.address)?;
                info!("  HTTP endpoint: {endpoint}");
            }
            None => warn!("Skipping {EXPORT_CACHE_ADDRESS} export: address unknown"),
        }

        match socket {
            Some(path) => {
                self.publisher
                    .set_output(OUTPUT_CACHE_SOCKET, &path.display().to_string())?;
                info!("  Unix socket: {}", path.display());
            }
            None => warn!("Home directory not found, not publishing cache socket path"),
        }

        info!("omni-cache is ready!");
        Ok(())
    }
}

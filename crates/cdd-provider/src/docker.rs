//! Docker runtime implementation using bollard

use crate::{
    format_ports, normalize_name, ContainerId, ContainerRuntime, ContainerState, ContainerSummary,
    CreateOptions, ListedPort, LogConfig, LogStream, NetworkCounters, ProviderError, RawStats,
    Result,
};
use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, ListContainersOptions, LogsOptions, RemoveContainerOptions,
    RestartContainerOptions, StartContainerOptions, StatsOptions, StopContainerOptions,
};
use bollard::image::{CreateImageOptions, ListImagesOptions};
use bollard::service::{HostConfig, PortBinding};
use bollard::Docker;
use futures::StreamExt;
use std::collections::HashMap;
use std::pin::Pin;
use tokio::io::AsyncRead;

/// Seconds the daemon waits for a graceful stop before killing
const STOP_GRACE_SECS: i64 = 10;

/// Docker runtime using the bollard crate
pub struct DockerRuntime {
    client: Docker,
}

impl DockerRuntime {
    /// Connect to a Docker daemon and verify it answers
    pub async fn new(socket_path: &str) -> Result<Self> {
        let client = if let Some(addr) = socket_path.strip_prefix("tcp://") {
            Docker::connect_with_http(&format!("http://{}", addr), 120, bollard::API_DEFAULT_VERSION)
                .map_err(|e| ProviderError::ConnectionError(e.to_string()))?
        } else if socket_path.starts_with("http://") || socket_path.starts_with("https://") {
            Docker::connect_with_http(socket_path, 120, bollard::API_DEFAULT_VERSION)
                .map_err(|e| ProviderError::ConnectionError(e.to_string()))?
        } else {
            let path = socket_path.trim_start_matches("unix://");
            Docker::connect_with_socket(path, 120, bollard::API_DEFAULT_VERSION)
                .map_err(|e| ProviderError::ConnectionError(e.to_string()))?
        };

        client
            .ping()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn list(&self, all: bool) -> Result<Vec<ContainerSummary>> {
        let options = ListContainersOptions::<String> {
            all,
            ..Default::default()
        };

        let containers = self.client.list_containers(Some(options)).await?;

        Ok(containers
            .into_iter()
            .map(|c| {
                let listed: Vec<ListedPort> = c
                    .ports
                    .unwrap_or_default()
                    .into_iter()
                    .map(|p| ListedPort {
                        private_port: p.private_port,
                        public_port: p.public_port,
                    })
                    .collect();

                ContainerSummary {
                    id: ContainerId::new(c.id.unwrap_or_default()),
                    name: normalize_name(c.names.as_ref().and_then(|n| n.first()).map(String::as_str)),
                    image: c.image.unwrap_or_default(),
                    state: c
                        .state
                        .as_deref()
                        .map(ContainerState::from)
                        .unwrap_or(ContainerState::Unknown),
                    status: c.status.unwrap_or_default(),
                    ports: format_ports(&listed),
                }
            })
            .collect())
    }

    async fn start(&self, id: &ContainerId) -> Result<()> {
        self.client
            .start_container(&id.0, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }

    async fn stop(&self, id: &ContainerId) -> Result<()> {
        let options = StopContainerOptions {
            t: STOP_GRACE_SECS,
        };
        self.client.stop_container(&id.0, Some(options)).await?;
        Ok(())
    }

    async fn restart(&self, id: &ContainerId) -> Result<()> {
        self.client
            .restart_container(&id.0, None::<RestartContainerOptions>)
            .await?;
        Ok(())
    }

    async fn remove(&self, id: &ContainerId, force: bool) -> Result<()> {
        let options = RemoveContainerOptions {
            force,
            ..Default::default()
        };
        self.client.remove_container(&id.0, Some(options)).await?;
        Ok(())
    }

    async fn create(&self, image: &str, options: &CreateOptions) -> Result<ContainerId> {
        let create_options = options.name.as_ref().map(|name| CreateContainerOptions {
            name: name.as_str(),
            platform: None,
        });

        let mut port_bindings: HashMap<String, Option<Vec<PortBinding>>> = HashMap::new();
        let mut exposed_ports: HashMap<String, HashMap<(), ()>> = HashMap::new();

        for port in &options.ports {
            let container_port = format!("{}/tcp", port.container_port);
            exposed_ports.insert(container_port.clone(), HashMap::new());

            let binding = PortBinding {
                host_ip: None,
                host_port: Some(port.host_port.to_string()),
            };
            port_bindings
                .entry(container_port)
                .or_insert_with(|| Some(Vec::new()))
                .get_or_insert_with(Vec::new)
                .push(binding);
        }

        let host_config = HostConfig {
            port_bindings: if port_bindings.is_empty() {
                None
            } else {
                Some(port_bindings)
            },
            ..Default::default()
        };

        let config = Config {
            image: Some(qualify_image(image)),
            env: if options.env.is_empty() {
                None
            } else {
                Some(options.env.clone())
            },
            tty: Some(options.tty),
            exposed_ports: if exposed_ports.is_empty() {
                None
            } else {
                Some(exposed_ports)
            },
            host_config: Some(host_config),
            ..Default::default()
        };

        let response = self.client.create_container(create_options, config).await?;
        for warning in &response.warnings {
            tracing::warn!("create {}: {}", image, warning);
        }

        Ok(ContainerId::new(response.id))
    }

    async fn stats(&self, id: &ContainerId) -> Result<RawStats> {
        let options = StatsOptions {
            stream: false,
            one_shot: false,
        };

        let mut stream = self.client.stats(&id.0, Some(options));
        let stats = match stream.next().await {
            Some(result) => result?,
            None => {
                return Err(ProviderError::RuntimeError(format!(
                    "No stats returned for {}",
                    id.short()
                )))
            }
        };

        let networks = stats
            .networks
            .unwrap_or_default()
            .into_iter()
            .map(|(name, net)| {
                (
                    name,
                    NetworkCounters {
                        rx_bytes: net.rx_bytes,
                        tx_bytes: net.tx_bytes,
                    },
                )
            })
            .collect();

        Ok(RawStats {
            cpu_total_usage: stats.cpu_stats.cpu_usage.total_usage,
            precpu_total_usage: stats.precpu_stats.cpu_usage.total_usage,
            system_cpu_usage: stats.cpu_stats.system_cpu_usage,
            presystem_cpu_usage: stats.precpu_stats.system_cpu_usage,
            online_cpus: stats.cpu_stats.online_cpus,
            percpu_count: stats
                .cpu_stats
                .cpu_usage
                .percpu_usage
                .as_ref()
                .map(|v| v.len() as u64),
            memory_usage: stats.memory_stats.usage,
            memory_limit: stats.memory_stats.limit,
            networks,
        })
    }

    async fn image_exists(&self, image: &str) -> Result<bool> {
        let wanted = qualify_image(image);
        let images = self
            .client
            .list_images(Some(ListImagesOptions::<String> {
                all: false,
                ..Default::default()
            }))
            .await?;

        Ok(images.iter().any(|img| {
            img.repo_tags.iter().any(|tag| tag == &wanted)
                || img.repo_digests.iter().any(|digest| digest.contains(image))
        }))
    }

    async fn pull_image(&self, image: &str) -> Result<()> {
        let reference = qualify_image(image);
        let options = CreateImageOptions {
            from_image: reference.as_str(),
            ..Default::default()
        };

        let mut stream = self.client.create_image(Some(options), None, None);

        while let Some(result) = stream.next().await {
            match result {
                Ok(info) => {
                    if let Some(error) = info.error {
                        return Err(ProviderError::PullError(error));
                    }
                    if let Some(status) = info.status {
                        tracing::debug!("pull {}: {}", reference, status);
                    }
                }
                Err(e) => return Err(ProviderError::PullError(e.to_string())),
            }
        }

        Ok(())
    }

    async fn logs(&self, id: &ContainerId, config: &LogConfig) -> Result<LogStream> {
        let options = LogsOptions::<String> {
            follow: config.follow,
            stdout: config.stdout,
            stderr: config.stderr,
            tail: config
                .tail
                .map(|t| t.to_string())
                .unwrap_or_else(|| "all".to_string()),
            ..Default::default()
        };

        let stream = self.client.logs(&id.0, Some(options));
        let reader = LogOutputReader::new(stream);

        // Dropping the reader closes the HTTP body, so no explicit hook is needed
        Ok(LogStream {
            stream: Box::pin(reader),
            cancel: None,
        })
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .ping()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        Ok(())
    }
}

/// Append `:latest` when the reference carries neither a tag nor a digest.
///
/// An untagged pull would otherwise fetch every tag of the repository.
fn qualify_image(image: &str) -> String {
    let last_segment = image.rsplit('/').next().unwrap_or(image);
    if image.contains('@') || last_segment.contains(':') {
        image.to_string()
    } else {
        format!("{}:latest", image)
    }
}

/// Reader that converts log output stream to AsyncRead
struct LogOutputReader<S> {
    stream: S,
    buffer: Vec<u8>,
    pos: usize,
}

impl<S> LogOutputReader<S> {
    fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: Vec::new(),
            pos: 0,
        }
    }
}

impl<S> AsyncRead for LogOutputReader<S>
where
    S: futures::Stream<Item = std::result::Result<bollard::container::LogOutput, bollard::errors::Error>>
        + Unpin,
{
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        loop {
            if self.pos < self.buffer.len() {
                let remaining = &self.buffer[self.pos..];
                let to_copy = std::cmp::min(remaining.len(), buf.remaining());
                buf.put_slice(&remaining[..to_copy]);
                self.pos += to_copy;
                return std::task::Poll::Ready(Ok(()));
            }

            match Pin::new(&mut self.stream).poll_next(cx) {
                std::task::Poll::Ready(Some(Ok(output))) => {
                    // stdout and stderr are merged into one stream
                    let data = match output {
                        bollard::container::LogOutput::StdOut { message } => message,
                        bollard::container::LogOutput::StdErr { message } => message,
                        bollard::container::LogOutput::StdIn { message } => message,
                        bollard::container::LogOutput::Console { message } => message,
                    };
                    self.buffer = data.to_vec();
                    self.pos = 0;
                    // An empty frame would read as EOF; poll again instead
                }
                std::task::Poll::Ready(Some(Err(e))) => {
                    return std::task::Poll::Ready(Err(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        e.to_string(),
                    )))
                }
                std::task::Poll::Ready(None) => return std::task::Poll::Ready(Ok(())),
                std::task::Poll::Pending => return std::task::Poll::Pending,
            }
        }
    }
}

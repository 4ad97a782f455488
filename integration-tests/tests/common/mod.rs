use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output};
use std::time::Duration;
use tempfile::TempDir;

/// Find a free TCP port by binding to port 0
pub fn find_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to port 0");
    listener.local_addr().unwrap().port()
}

/// Wait for a TCP port to accept connections
pub async fn wait_for_port(port: u16, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if tokio::time::Instant::now() > deadline {
            panic!("Timed out waiting for port {} to be ready", port);
        }
        if tokio::net::TcpStream::connect(format!("127.0.0.1:{}", port))
            .await
            .is_ok()
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

/// Get the path to a compiled binary in the target directory
pub fn cargo_bin(name: &str) -> PathBuf {
    // Look for the binary in target/debug (standard cargo test location)
    let mut path = std::env::current_exe()
        .expect("Failed to get current exe")
        .parent()
        .expect("No parent")
        .parent()
        .expect("No grandparent")
        .to_path_buf();
    path.push(name);
    if path.exists() {
        return path;
    }

    // Fallback: try target/debug directly
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // integration-tests -> workspace root
    path.push("target");
    path.push("debug");
    path.push(name);
    if path.exists() {
        return path;
    }

    panic!("Binary '{}' not found. Run `cargo build --workspace` first.", name);
}

/// Write an executable shell script standing in for the container runtime
pub fn write_stub_runtime(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("docker-stub");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write stub");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to chmod stub");
    path
}

/// A stats endpoint running against a stubbed container runtime
pub struct StatsServer {
    pub port: u16,
    server: Child,
    _temp_dir: TempDir,
}

impl StatsServer {
    /// Start the stats endpoint on an ephemeral port, pointed at a stub
    /// runtime script with the given body
    pub async fn with_stub(stub_body: &str, stats_timeout_secs: u64) -> Self {
        let port = find_free_port();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let stub = write_stub_runtime(temp_dir.path(), stub_body);

        let server = Command::new(cargo_bin("duskfleet-statsd"))
            .args(["--port", &port.to_string()])
            .args(["--docker-bin", stub.to_str().unwrap()])
            .args(["--stats-timeout", &stats_timeout_secs.to_string()])
            .args(["--log-level", "debug"])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .expect("Failed to start stats endpoint");

        wait_for_port(port, Duration::from_secs(10)).await;

        Self {
            port,
            server,
            _temp_dir: temp_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

impl Drop for StatsServer {
    fn drop(&mut self) {
        let _ = self.server.kill();
        let _ = self.server.wait();
    }
}

/// Run the manifest generator with the given arguments and wait for it
pub fn run_composegen(args: &[&str]) -> Output {
    Command::new(cargo_bin("duskfleet-composegen"))
        .args(args)
        .output()
        .expect("Failed to run composegen")
}

//! Test fixtures for process-based integration tests.

use std::net::TcpStream;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Master API key the test server is started with
pub const TEST_MASTER_API_KEY: &str = "test-master-key";

/// JWT secret the test server is started with
pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Helper struct to manage server process lifecycle
pub struct TestServer {
    process: Child,
    port: u16,
}

impl TestServer {
    /// Start a test server on the specified port and wait until it
    /// accepts TCP connections
    pub fn start(port: u16) -> Self {
        let process = Command::new("cargo")
            .args([
                "run",
                "-p",
                "dojo-server",
                "--bin",
                "dojo-server",
                "--",
                "--port",
                &port.to_string(),
            ])
            .env("JWT_SECRET", TEST_JWT_SECRET)
            .env("MASTER_API_KEY", TEST_MASTER_API_KEY)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to start server");

        let server = TestServer { process, port };
        server.wait_until_ready(Duration::from_secs(120));
        server
    }

    /// Base URL for HTTP requests
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }

    /// Poll until the server accepts TCP connections (the first start may
    /// include a compile of the binary)
    fn wait_until_ready(&self, timeout: Duration) {
        let start = Instant::now();
        loop {
            if TcpStream::connect(("127.0.0.1", self.port)).is_ok() {
                return;
            }
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready on port {} within {:?}",
                    self.port, timeout
                );
            }
            thread::sleep(Duration::from_millis(100));
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Kill the server process when the test ends
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

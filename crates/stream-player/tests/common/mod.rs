#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;

use nix::sys::signal::kill;
use nix::unistd::Pid;
use stream_player::{BinaryLocator, Orchestrator, PlayerConfig};

/// Records its args and pid, then stays alive as the same pid.
pub const STAYS_UP: &str = "#!/bin/sh\necho \"$@\" > \"$0.args\"\necho $$ >> \"$0.pids\"\nexec sleep 30\n";
/// Pipe sink: records args and pid, then drains stdin.
pub const DRAINS_STDIN: &str = "#!/bin/sh\necho \"$@\" > \"$0.args\"\necho $$ >> \"$0.pids\"\nexec cat > /dev/null\n";
/// Exits right away, like a player refusing the stream.
pub const EXITS: &str = "#!/bin/sh\necho $$ >> \"$0.pids\"\nexit 1\n";
/// Exits after a short delay.
pub const EXITS_LATE: &str = "#!/bin/sh\necho $$ >> \"$0.pids\"\nsleep 0.2\nexit 1\n";

pub fn temp_dir(tag: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!(
        "stream-player-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&root).expect("create temp dir");
    root
}

/// Directory of fake backend programs.
pub struct FakeBins {
    pub dir: PathBuf,
}

impl FakeBins {
    pub fn new(tag: &str, programs: &[(&str, &str)]) -> Self {
        let dir = temp_dir(tag);
        for (name, script) in programs {
            let path = dir.join(name);
            std::fs::write(&path, script).expect("write script");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("chmod script");
        }
        // Let concurrently forked children exec before we run the scripts
        // (avoids ETXTBSY on freshly written files).
        std::thread::sleep(Duration::from_millis(50));
        Self { dir }
    }

    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(test_config(), BinaryLocator::with_dirs(vec![self.dir.clone()]))
    }

    pub fn args(&self, program: &str) -> Option<String> {
        std::fs::read_to_string(self.dir.join(format!("{program}.args")))
            .ok()
            .map(|s| s.trim().to_string())
    }

    /// Every pid the program has been started with.
    pub fn pids(&self, program: &str) -> Vec<u32> {
        std::fs::read_to_string(self.dir.join(format!("{program}.pids")))
            .unwrap_or_default()
            .lines()
            .filter_map(|line| line.trim().parse().ok())
            .collect()
    }

    pub fn was_started(&self, program: &str) -> bool {
        self.dir.join(format!("{program}.pids")).exists()
    }
}

/// Fast timings and no name sweep, so parallel tests never signal each other.
pub fn test_config() -> PlayerConfig {
    PlayerConfig {
        settle_interval: Duration::from_millis(300),
        stop_timeout: Duration::from_secs(1),
        poll_interval: Duration::from_millis(20),
        sweep_names: Vec::new(),
        ..PlayerConfig::default()
    }
}

pub fn is_alive(pid: u32) -> bool {
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

pub fn alive_count(pids: &[u32]) -> usize {
    pids.iter().filter(|pid| is_alive(**pid)).count()
}

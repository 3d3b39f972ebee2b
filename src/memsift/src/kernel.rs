//! Kernel identification read from procfs.

use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KernelInfo {
    pub os_type: String,
    pub os_release: String,
    pub boot_args: String,
    pub full_version: String,
}

impl KernelInfo {
    /// Read from a procfs root. Unreadable files leave their field empty.
    pub fn read(root: &Path) -> Self {
        let read = |relative: &str| {
            fs::read(root.join(relative))
                .map(|data| String::from_utf8_lossy(&data).trim().to_string())
                .unwrap_or_default()
        };

        KernelInfo {
            os_type: read("sys/kernel/ostype"),
            os_release: read("sys/kernel/osrelease"),
            boot_args: read("cmdline"),
            full_version: read("version"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_kernel_info() {
        let temp = tempfile::tempdir().unwrap();
        let kernel_dir = temp.path().join("sys").join("kernel");
        fs::create_dir_all(&kernel_dir).unwrap();
        fs::write(kernel_dir.join("ostype"), "Linux\n").unwrap();
        fs::write(kernel_dir.join("osrelease"), "6.8.0-40-generic\n").unwrap();
        fs::write(temp.path().join("cmdline"), "BOOT_IMAGE=/vmlinuz ro quiet\n").unwrap();

        let info = KernelInfo::read(temp.path());
        assert_eq!(info.os_type, "Linux");
        assert_eq!(info.os_release, "6.8.0-40-generic");
        assert_eq!(info.boot_args, "BOOT_IMAGE=/vmlinuz ro quiet");
        // Missing file
        assert_eq!(info.full_version, "");
    }
}

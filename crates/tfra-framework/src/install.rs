//! Resolution of the framework's build metadata for a host.

use std::path::Path;

use serde::Serialize;
use tfra_host::HostPlatform;

use crate::error::Result;
use crate::flags;
use crate::headers::BundledHeaders;
use crate::sysconfig::Sysconfig;
use crate::version::{TfVersion, FIRST_HEADERS_RELEASE};

/// Shared library name on macOS.
pub const MACOS_LIBRARY: &str = "libtensorflow_framework.dylib";
/// Import library name on Windows.
pub const WINDOWS_LIBRARY: &str = "_pywrap_tensorflow_internal.lib";
/// Shared library name on Raspberry Pi, whose link flags come back empty.
pub const RASPI_LIBRARY: &str = "_pywrap_tensorflow_internal.so";

/// Everything the native build needs to know about the installed framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameworkInstallInfo {
    /// Parsed framework version.
    pub version: TfVersion,
    /// 4-digit version integer.
    pub version_integer: u32,
    /// Directory holding the framework's C++ headers.
    pub header_dir: String,
    /// Directory holding the framework's shared library.
    pub shared_lib_dir: String,
    /// File name of the shared library to link.
    pub shared_lib_name: String,
    /// C++11 ABI flag the framework was built with.
    pub cxx11_abi_flag: i32,
}

impl FrameworkInstallInfo {
    /// Resolve build metadata from a sysconfig for the given host.
    ///
    /// `source_root` is where the bundled legacy headers live.
    pub fn resolve(sysconfig: &Sysconfig, host: HostPlatform, source_root: &Path) -> Result<Self> {
        let version = sysconfig.parsed_version()?;
        let version_integer = version.version_integer()?;

        let info = Self {
            header_dir: resolve_header_dir(sysconfig, &version, host, source_root)?,
            shared_lib_dir: resolve_shared_lib_dir(sysconfig, host)?,
            shared_lib_name: resolve_shared_lib_name(sysconfig, host)?,
            cxx11_abi_flag: sysconfig.cxx11_abi_flag,
            version,
            version_integer,
        };
        log::debug!("resolved TensorFlow install: {info:?}");
        Ok(info)
    }

    /// Whether the headers come from the bundled archives.
    pub fn uses_bundled_headers(&self) -> bool {
        self.version_integer < FIRST_HEADERS_RELEASE
    }
}

/// The directory of the framework's C++ headers.
pub fn resolve_header_dir(
    sysconfig: &Sysconfig,
    version: &TfVersion,
    host: HostPlatform,
    source_root: &Path,
) -> Result<String> {
    if version.version_integer()? < FIRST_HEADERS_RELEASE {
        let headers = BundledHeaders::new(source_root, version.as_str());
        return Ok(headers.header_dir().display().to_string());
    }

    let dir = flags::include_dir(&sysconfig.compile_flags)?;
    Ok(match host {
        HostPlatform::Windows => flags::to_forward_slashes(dir),
        _ => dir.to_string(),
    })
}

/// The directory of the framework's shared library.
pub fn resolve_shared_lib_dir(sysconfig: &Sysconfig, host: HostPlatform) -> Result<String> {
    match host {
        HostPlatform::Windows => Ok(flags::to_forward_slashes(&flags::python_lib_dir(
            &sysconfig.compile_flags,
        )?)),
        HostPlatform::RaspberryPi => flags::python_lib_dir(&sysconfig.compile_flags),
        HostPlatform::MacOs | HostPlatform::MacOsArm64 | HostPlatform::Linux => {
            Ok(flags::library_dir(&sysconfig.link_flags)?.to_string())
        }
    }
}

/// The file name of the framework's shared library.
pub fn resolve_shared_lib_name(sysconfig: &Sysconfig, host: HostPlatform) -> Result<String> {
    match host {
        HostPlatform::MacOs | HostPlatform::MacOsArm64 => Ok(MACOS_LIBRARY.to_string()),
        HostPlatform::Windows => Ok(WINDOWS_LIBRARY.to_string()),
        HostPlatform::RaspberryPi => Ok(RASPI_LIBRARY.to_string()),
        HostPlatform::Linux => Ok(flags::library_name(&sysconfig.link_flags)?.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameworkError;

    fn sysconfig(version: &str, compile: &[&str], link: &[&str]) -> Sysconfig {
        Sysconfig {
            version: version.to_string(),
            compile_flags: compile.iter().map(|f| f.to_string()).collect(),
            link_flags: link.iter().map(|f| f.to_string()).collect(),
            cxx11_abi_flag: 1,
        }
    }

    fn linux() -> Sysconfig {
        sysconfig(
            "2.5.1",
            &["-I/py/site-packages/tensorflow/include", "-D_GLIBCXX_USE_CXX11_ABI=1"],
            &["-L/py/site-packages/tensorflow", "-l:libtensorflow_framework.so.2"],
        )
    }

    fn macos() -> Sysconfig {
        sysconfig(
            "2.5.1",
            &["-I/Library/py/tensorflow/include"],
            &["-L/Library/py/tensorflow", "-ltensorflow_framework.2"],
        )
    }

    fn windows() -> Sysconfig {
        sysconfig(
            "2.5.1",
            &[r"-IC:\py\lib\site-packages\tensorflow\include", "/DEIGEN_MAX_ALIGN_BYTES=64"],
            &[r"-LC:\py\lib\site-packages\tensorflow", "-l:pywrap_tensorflow_internal.lib"],
        )
    }

    fn raspi() -> Sysconfig {
        sysconfig("2.4.1", &["-I/home/pi/py/tensorflow/include"], &[])
    }

    fn resolve(sc: &Sysconfig, host: HostPlatform) -> Result<FrameworkInstallInfo> {
        FrameworkInstallInfo::resolve(sc, host, Path::new("/src/tfra"))
    }

    #[test]
    fn linux_install() {
        let info = resolve(&linux(), HostPlatform::Linux).unwrap();
        assert_eq!(info.version_integer, 2051);
        assert_eq!(info.header_dir, "/py/site-packages/tensorflow/include");
        assert_eq!(info.shared_lib_dir, "/py/site-packages/tensorflow");
        assert_eq!(info.shared_lib_name, "libtensorflow_framework.so.2");
        assert_eq!(info.cxx11_abi_flag, 1);
        assert!(!info.uses_bundled_headers());
    }

    #[test]
    fn macos_install_uses_fixed_library_name() {
        for host in [HostPlatform::MacOs, HostPlatform::MacOsArm64] {
            let info = resolve(&macos(), host).unwrap();
            assert_eq!(info.shared_lib_dir, "/Library/py/tensorflow");
            assert_eq!(info.shared_lib_name, MACOS_LIBRARY);
        }
    }

    #[test]
    fn windows_install_normalises_separators() {
        let info = resolve(&windows(), HostPlatform::Windows).unwrap();
        assert_eq!(info.header_dir, "C:/py/lib/site-packages/tensorflow/include");
        assert_eq!(info.shared_lib_dir, "C:/py/lib/site-packages/tensorflow/python");
        assert_eq!(info.shared_lib_name, WINDOWS_LIBRARY);
    }

    #[test]
    fn raspi_install_ignores_empty_link_flags() {
        let info = resolve(&raspi(), HostPlatform::RaspberryPi).unwrap();
        assert_eq!(info.shared_lib_dir, "/home/pi/py/tensorflow/python");
        assert_eq!(info.shared_lib_name, RASPI_LIBRARY);
    }

    #[test]
    fn linux_with_empty_link_flags_fails() {
        let err = resolve_shared_lib_name(&raspi(), HostPlatform::Linux).unwrap_err();
        assert!(matches!(err, FrameworkError::MissingFlag { kind: "link", .. }));
    }

    #[test]
    fn legacy_release_uses_bundled_headers() {
        let sc = sysconfig(
            "1.15.2",
            &["-I/py/tensorflow_core/include"],
            &["-L/py/tensorflow_core", "-l:libtensorflow_framework.so.1"],
        );
        let info = resolve(&sc, HostPlatform::Linux).unwrap();
        assert_eq!(info.version_integer, 1152);
        assert!(info.uses_bundled_headers());
        assert_eq!(info.header_dir, "/src/tfra/build_deps/tf_header/1.15.2/tensorflow");
        assert_eq!(info.shared_lib_name, "libtensorflow_framework.so.1");
    }

    #[test]
    fn malformed_version_is_reported() {
        let sc = sysconfig("2.0", &[], &[]);
        let err = resolve(&sc, HostPlatform::Linux).unwrap_err();
        assert!(matches!(err, FrameworkError::MalformedVersion { .. }));
    }
}

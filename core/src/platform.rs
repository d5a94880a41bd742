use crate::error::PasteError;

/// Operating system the current process runs on, captured once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    os: String,
}

impl Platform {
    pub const SUPPORTED_OS: &'static str = "macos";

    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn ensure_supported(&self) -> Result<(), PasteError> {
        if self.os == Self::SUPPORTED_OS {
            return Ok(());
        }
        Err(PasteError::UnsupportedPlatform {
            platform: self.os.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_macos_passes_the_gate() {
        assert!(Platform::from_os("macos").ensure_supported().is_ok());

        let err = Platform::from_os("linux")
            .ensure_supported()
            .expect_err("linux is unsupported");
        assert_eq!(err.to_string(), "md-img-paster does not work on linux.");
    }
}

use std::fs::File;

use camino::Utf8PathBuf;

use hue::bridge::Credentials;

use crate::error::SkillResult;

/// Bridge address and username, remembered between runs.
#[derive(Clone, Debug)]
pub struct CredentialStore {
    file: Option<Utf8PathBuf>,
}

impl CredentialStore {
    #[must_use]
    pub const fn new(file: Option<Utf8PathBuf>) -> Self {
        Self { file }
    }

    /// Read stored credentials. A missing or unreadable file is not an error,
    /// the bridge will be discovered and registered again.
    #[must_use]
    pub fn load(&self) -> Credentials {
        let Some(file) = &self.file else {
            return Credentials::default();
        };

        if !file.is_file() {
            log::info!("No bridge credentials file [{file}], bridge will be registered");
            return Credentials::default();
        }

        match File::open(file).and_then(|fd| {
            serde_yml::from_reader::<_, Credentials>(fd).map_err(std::io::Error::other)
        }) {
            Ok(credentials) => {
                log::debug!("Loaded bridge credentials from [{file}]");
                credentials
            }
            Err(err) => {
                log::warn!("Failed to parse {file}, ignoring: {err}");
                Credentials::default()
            }
        }
    }

    pub fn save(&self, credentials: &Credentials) -> SkillResult<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };

        let fd = File::create(file)?;
        serde_yml::to_writer(fd, credentials)?;
        log::debug!("Saved bridge credentials to [{file}]");
        Ok(())
    }
}

use aws_config::SdkConfig;

/// Cloud provider
/// This enum represents the cloud providers the ledger can persist to. The
/// concrete table client is built from the handle it carries.
#[derive(Clone)]
pub enum CloudProvider {
    AWS(Box<SdkConfig>),
}

impl CloudProvider {
    /// Load the ambient AWS configuration (region, credentials, endpoint
    /// resolution are the SDK's concern) and wrap it as a provider handle.
    pub async fn from_aws_env() -> Self {
        let config = aws_config::from_env().load().await;
        CloudProvider::AWS(Box::new(config))
    }

    /// Wrap an already-built SDK configuration.
    pub fn from_aws(config: SdkConfig) -> Self {
        CloudProvider::AWS(Box::new(config))
    }

    /// Get the AWS SDK config backing this provider.
    pub fn aws_config(&self) -> &SdkConfig {
        match self {
            CloudProvider::AWS(config) => config.as_ref(),
        }
    }

    pub fn provider_name(&self) -> String {
        match self {
            CloudProvider::AWS(_) => "AWS".to_string(),
        }
    }
}

impl std::fmt::Debug for CloudProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.provider_name().as_str())
    }
}

// Implement Display using Debug since they share the same formatting
impl std::fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

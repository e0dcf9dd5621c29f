use clap::Args;

pub const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";
pub const DEFAULT_SERVICE_ID: &str = "service_qud8l6l";

/// EmailJS settings, read from flags or the environment (a `.env` file is
/// loaded first).
#[derive(Debug, Clone, Args)]
pub struct EmailConfig {
    #[arg(long = "emailjs-endpoint", env = "EMAILJS_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
    #[arg(long = "emailjs-service", env = "EMAILJS_SERVICE_ID", default_value = DEFAULT_SERVICE_ID)]
    pub service_id: String,
    #[arg(long = "emailjs-template", env = "EMAILJS_TEMPLATE_ID")]
    pub template_id: Option<String>,
    #[arg(long = "emailjs-public-key", env = "EMAILJS_PUBLIC_KEY", hide_env_values = true)]
    pub public_key: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            service_id: DEFAULT_SERVICE_ID.to_string(),
            template_id: None,
            public_key: None,
        }
    }
}

impl EmailConfig {
    pub fn template_id(&self) -> Option<&str> {
        non_blank(self.template_id.as_deref())
    }

    pub fn public_key(&self) -> Option<&str> {
        non_blank(self.public_key.as_deref())
    }

    pub fn is_complete(&self) -> bool {
        self.template_id().is_some() && self.public_key().is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

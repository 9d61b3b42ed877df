pub const PAGE_TITLE: &str = "Stronix Academia";
pub const PAGE_DESCRIPTION: &str =
    "Uma academia totalmente renovada, projetada para melhorar os resultados dos nossos alunos";

const DEFAULT_INVITE_LINK: &str = "https://chat.whatsapp.com/SEU-LINK-AQUI";
const REDIRECT_DELAY_MS: u32 = 2_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormConfig {
    /// Where leads are posted. `None` means submissions succeed without
    /// any network call.
    pub webhook_url: Option<String>,
    pub invite_link: String,
    pub redirect_delay_ms: u32,
}

impl FormConfig {
    pub fn new(webhook_url: Option<&str>, invite_link: Option<&str>) -> Self {
        let non_blank = |v: &str| {
            let v = v.trim();
            (!v.is_empty()).then(|| v.to_string())
        };
        Self {
            webhook_url: webhook_url.and_then(non_blank),
            invite_link: invite_link
                .and_then(non_blank)
                .unwrap_or_else(|| DEFAULT_INVITE_LINK.to_string()),
            redirect_delay_ms: REDIRECT_DELAY_MS,
        }
    }

    // The bundle runs in the browser, so "environment" means whatever was
    // set when trunk built it. The invite link is always the fixed constant.
    pub fn from_build_env() -> Self {
        Self::new(option_env!("LEAD_WEBHOOK_URL"), None)
    }
}

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of the Firebase Realtime Database, e.g.
    /// `https://my-project-default-rtdb.firebaseio.com`
    pub firebase_database_url: String,
    /// Optional database secret / legacy token appended as `?auth=` on
    /// inventory requests. Unset means open rules (dev only).
    pub firebase_auth: Option<String>,
    /// Target spreadsheet for the order log.
    pub sheet_id: String,
    /// Append range within the spreadsheet.
    pub sheet_range: String,
    /// Service account identity used to sign the Google OAuth assertion.
    pub service_email: String,
    /// Service account private key, PEM. Env values commonly carry literal
    /// `\n` sequences; those are unescaped here.
    pub service_key: String,
    pub dev_mode: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("PENFOLIO_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self {
            host,
            port,
            firebase_database_url: env::var("FIREBASE_DATABASE_URL").unwrap_or_default(),
            firebase_auth: env::var("FIREBASE_AUTH").ok(),
            sheet_id: env::var("SHEET_ID").unwrap_or_default(),
            sheet_range: env::var("SHEET_RANGE")
                .unwrap_or_else(|_| "InventoryLog!A1".to_string()),
            service_email: env::var("SERVICE_EMAIL").unwrap_or_default(),
            service_key: env::var("SERVICE_KEY")
                .map(|k| k.replace("\\n", "\n"))
                .unwrap_or_default(),
            dev_mode,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Tunables of the menu engine. Defaults reproduce the historical behaviour.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Fraction of the slot target a selection must reach before filling stops.
    pub tolerance_lower: f64,
    /// Fraction of the slot target a selection may never exceed.
    pub tolerance_upper: f64,
    /// Minimum number of qualifying dishes a source needs to be picked.
    pub min_source_dishes: i64,
    /// Weight of protein/fat/carbs deltas relative to calories in the replacement score.
    pub macro_weight: f64,
    pub split_breakfast: f64,
    pub split_lunch: f64,
    pub split_dinner: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            tolerance_lower: 0.9,
            tolerance_upper: 1.1,
            min_source_dishes: 3,
            macro_weight: 10.0,
            split_breakfast: 0.3,
            split_lunch: 0.4,
            split_dinner: 0.3,
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let cfg = Self {
            tolerance_lower: env_or("MENU_TOLERANCE_LOWER", defaults.tolerance_lower),
            tolerance_upper: env_or("MENU_TOLERANCE_UPPER", defaults.tolerance_upper),
            min_source_dishes: env_or("MENU_MIN_SOURCE_DISHES", defaults.min_source_dishes),
            macro_weight: env_or("MENU_MACRO_WEIGHT", defaults.macro_weight),
            split_breakfast: env_or("MENU_SPLIT_BREAKFAST", defaults.split_breakfast),
            split_lunch: env_or("MENU_SPLIT_LUNCH", defaults.split_lunch),
            split_dinner: env_or("MENU_SPLIT_DINNER", defaults.split_dinner),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.tolerance_lower <= self.tolerance_upper,
            "MENU_TOLERANCE_LOWER ({}) must not exceed MENU_TOLERANCE_UPPER ({})",
            self.tolerance_lower,
            self.tolerance_upper
        );
        anyhow::ensure!(self.min_source_dishes >= 1, "MENU_MIN_SOURCE_DISHES must be >= 1");
        anyhow::ensure!(self.macro_weight >= 0.0, "MENU_MACRO_WEIGHT must be >= 0");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub planner: PlannerConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "smartmenu".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "smartmenu-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let planner = PlannerConfig::from_env()?;
        Ok(Self {
            database_url,
            jwt,
            planner,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

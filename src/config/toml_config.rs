use crate::core::catalogue::Catalogue;
use crate::core::credits::RegistrationPolicy;
use crate::core::progress::DegreePlan;
use crate::domain::model::{CompletedCourse, Course, StudentProfile};
use crate::domain::ports::Storage;
use crate::utils::error::{RegistrarError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// 一次選課操作的 TOML 設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub registration: RegistrationPolicy,
    #[serde(default)]
    pub student: StudentProfile,
    #[serde(default)]
    pub catalogue: CatalogueConfig,
    #[serde(default)]
    pub degree: DegreePlan,
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogueConfig {
    /// 相對路徑以設定檔所在目錄為基準
    pub path: Option<String>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub history: Vec<CompletedCourse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Add,
    Confirm,
    Remove,
    Drop,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            ActionKind::Add => "add",
            ActionKind::Confirm => "confirm",
            ActionKind::Remove => "remove",
            ActionKind::Drop => "drop",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub action: ActionKind,
    /// Course id
    pub course: String,
}

impl SessionConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RegistrarError::IoError)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            RegistrarError::TomlError { message, .. } => RegistrarError::TomlError {
                source_name: path.as_ref().display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RegistrarError::TomlError {
            source_name: "session".to_string(),
            message: e.to_string(),
        })
    }

    /// 替換環境變數 (例如 ${CATALOGUE_DIR})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 載入課程目錄：先讀取外部檔案（若有設定），再合併設定檔內的課程
    pub async fn load_catalogue<S: Storage>(&self, storage: &S) -> Result<Catalogue> {
        let mut catalogue = match &self.catalogue.path {
            Some(path) => {
                tracing::debug!("Reading catalogue from {}", path);
                let data = storage.read_file(path).await?;
                Catalogue::from_bytes(path, &data)?
            }
            None => Catalogue::default(),
        };

        catalogue.courses.extend(self.catalogue.courses.iter().cloned());
        catalogue.history.extend(self.catalogue.history.iter().cloned());
        catalogue.validate()?;

        tracing::info!(
            "Catalogue loaded: {} courses, {} history records",
            catalogue.courses.len(),
            catalogue.history.len()
        );
        Ok(catalogue)
    }
}

impl Validate for SessionConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number(
            "registration.credit_ceiling",
            self.registration.credit_ceiling,
            1,
        )?;
        validate_range(
            "registration.recommended_min_credits",
            self.registration.recommended_min_credits,
            0,
            self.registration.credit_ceiling,
        )?;

        if let Some(path) = &self.catalogue.path {
            validate_path("catalogue.path", path)?;
        } else if self.catalogue.courses.is_empty() {
            return Err(RegistrarError::MissingConfigError {
                field: "catalogue.path or catalogue.courses".to_string(),
            });
        }

        self.degree.validate()?;

        for action in &self.actions {
            validate_non_empty_string(&format!("actions.{}.course", action.action), &action.course)?;
        }

        Ok(())
    }
}

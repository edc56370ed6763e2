//! 配置加载器实现
//!
//! 提供TOML配置文件解析、环境变量替换和错误处理功能

use crate::config::types::{validate_config, Config};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载配置
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<Config>` - 加载的配置或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config>;

    /// 从字符串加载配置
    async fn load_from_string(&self, content: &str) -> Result<Config>;

    /// 验证配置
    fn validate(&self, config: &Config) -> Result<()>;
}

/// TOML配置加载器实现
#[derive(Debug, Clone)]
pub struct TomlConfigLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl TomlConfigLoader {
    /// 创建新的TOML配置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用环境变量替换
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换字符串中的 `${VAR_NAME}` 环境变量
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        let env_var_regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {}", e)))?;

        let mut result = content.to_string();

        for captures in env_var_regex.captures_iter(content) {
            let full_match = &captures[0];
            let var_name = &captures[1];

            match std::env::var(var_name) {
                Ok(value) => {
                    result = result.replace(full_match, &value);
                }
                Err(_) => {
                    return Err(ConfigError::EnvVarError {
                        var: var_name.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(result)
    }

    /// 解析TOML内容
    fn parse_toml(&self, content: &str) -> Result<Config> {
        let processed_content = self.substitute_env_vars(content)?;

        let config: Config = toml::from_str(&processed_content)
            .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {}", e)))?;

        Ok(config)
    }
}

impl Default for TomlConfigLoader {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl ConfigLoader for TomlConfigLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {}", e)))?;

        let config = self.parse_toml(&content)?;
        self.validate(&config)?;

        tracing::info!("成功加载配置文件: {}", path.display());
        tracing::debug!("配置内容: {:?}", config);

        Ok(config)
    }

    async fn load_from_string(&self, content: &str) -> Result<Config> {
        let config = self.parse_toml(content)?;
        self.validate(&config)?;

        tracing::debug!("成功解析配置字符串");

        Ok(config)
    }

    fn validate(&self, config: &Config) -> Result<()> {
        validate_config(config).map_err(|e| ConfigError::ValidationError(e).into())
    }
}

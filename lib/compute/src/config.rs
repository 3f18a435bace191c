// SPDX-FileCopyrightText: Copyright (c) 2024-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Zero-pad configuration.
//!
//! Configuration is resolved once, up front, and passed explicitly into the
//! zero-pad path. Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. `/opt/zeropad/etc/zeropad.toml`
//! 3. TOML file pointed to by `ZEROPAD_CONFIG_PATH`
//! 4. `ZEROPAD_VERBOSE` and `ZEROPAD_MAX_STEP_SIZE` environment variables

use anyhow::Result;
use derive_builder::Builder;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Largest step size (product of inner block sizes) any compiled zero-pad
/// kernel variant handles.
pub const ZERO_PAD_MAX_STEP_SIZE: usize = 1536;

/// System-wide configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/opt/zeropad/etc/zeropad.toml";

/// Environment variable naming an extra configuration file.
pub const ZEROPAD_CONFIG_PATH: &str = "ZEROPAD_CONFIG_PATH";

const ENV_PREFIX: &str = "ZEROPAD_";

#[derive(Serialize, Deserialize, Validate, Debug, Builder, Clone, PartialEq, Eq)]
#[builder(build_fn(private, name = "build_internal"), derive(Debug))]
pub struct ZeroPadConfig {
    /// Time each dispatch and emit one verbose line per padded tensor.
    #[builder(default = "false")]
    #[serde(default)]
    pub verbose: bool,

    /// Step size limit of the specialized kernel; larger steps use the fallback.
    #[validate(range(min = 1))]
    #[builder(default = "ZERO_PAD_MAX_STEP_SIZE")]
    #[serde(default = "default_max_step_size")]
    pub max_step_size: usize,
}

fn default_max_step_size() -> usize {
    ZERO_PAD_MAX_STEP_SIZE
}

impl Default for ZeroPadConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            max_step_size: ZERO_PAD_MAX_STEP_SIZE,
        }
    }
}

impl ZeroPadConfigBuilder {
    pub fn build(&self) -> Result<ZeroPadConfig> {
        let config = self.build_internal()?;
        config.validate()?;
        Ok(config)
    }
}

impl ZeroPadConfig {
    pub fn builder() -> ZeroPadConfigBuilder {
        ZeroPadConfigBuilder::default()
    }

    pub(crate) fn figment() -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(ZeroPadConfig::default()))
            .merge(Toml::file(DEFAULT_CONFIG_PATH));

        if let Ok(path) = std::env::var(ZEROPAD_CONFIG_PATH)
            && !path.is_empty()
        {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(
            Env::prefixed(ENV_PREFIX)
                .only(&["verbose", "max_step_size"])
                .filter_map(|k| {
                    let full_key = format!("{}{}", ENV_PREFIX, k.as_str().to_uppercase());
                    // filters out empty environment variables
                    match std::env::var(&full_key) {
                        Ok(v) if !v.is_empty() => Some(k.into()),
                        _ => None,
                    }
                }),
        )
    }

    /// Load the configuration from files and environment.
    pub fn from_settings() -> Result<ZeroPadConfig> {
        let config: ZeroPadConfig = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }
}

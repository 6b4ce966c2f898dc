use serde::Deserialize;

use crate::chain::Chain;
use crate::clutter::ClutterRemoval;
use crate::gamma::GammaContrast;
use crate::gauss::GaussianBlur;
use crate::laplacian::LaplacianSharpen;
use crate::operator::Operator;
use crate::preset::Preset;
use crate::unsharp::UnsharpMask;

fn default_enable() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContrastEnhanceConfig {
    #[serde(default = "default_enable")]
    pub enable: bool,
    #[serde(default = "ContrastEnhanceConfig::default_gamma")]
    pub gamma: f32,
}

impl ContrastEnhanceConfig {
    fn default_gamma() -> f32 {
        0.75
    }
}

impl Default for ContrastEnhanceConfig {
    fn default() -> Self {
        Self {
            enable: true,
            gamma: Self::default_gamma(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeEnhanceConfig {
    #[serde(default = "default_enable")]
    pub enable: bool,
    #[serde(default = "EdgeEnhanceConfig::default_ksize")]
    pub ksize: usize,
    #[serde(default = "EdgeEnhanceConfig::default_amount")]
    pub amount: f32,
}

impl EdgeEnhanceConfig {
    fn default_ksize() -> usize {
        5
    }
    fn default_amount() -> f32 {
        1.0
    }
}

impl Default for EdgeEnhanceConfig {
    fn default() -> Self {
        Self {
            enable: true,
            ksize: Self::default_ksize(),
            amount: Self::default_amount(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DenoiseConfig {
    #[serde(default = "default_enable")]
    pub enable: bool,
    #[serde(default = "DenoiseConfig::default_ksize")]
    pub ksize: usize,
    #[serde(default)]
    pub sigma: f32,
}

impl DenoiseConfig {
    fn default_ksize() -> usize {
        3
    }
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            enable: true,
            ksize: Self::default_ksize(),
            sigma: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeblurConfig {
    #[serde(default = "default_enable")]
    pub enable: bool,
    #[serde(default = "DeblurConfig::default_alpha")]
    pub alpha: f32,
    #[serde(default = "DeblurConfig::default_ks")]
    pub ks: usize,
}

impl DeblurConfig {
    fn default_alpha() -> f32 {
        1.2
    }
    fn default_ks() -> usize {
        3
    }
}

impl Default for DeblurConfig {
    fn default() -> Self {
        Self {
            enable: true,
            alpha: Self::default_alpha(),
            ks: Self::default_ks(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClutterRemovalConfig {
    #[serde(default = "default_enable")]
    pub enable: bool,
    #[serde(default = "ClutterRemovalConfig::default_history")]
    pub history: u32,
    #[serde(default = "ClutterRemovalConfig::default_var_threshold")]
    pub var_threshold: f32,
    #[serde(default)]
    pub detect_shadows: bool,
}

impl ClutterRemovalConfig {
    fn default_history() -> u32 {
        50
    }
    fn default_var_threshold() -> f32 {
        25.0
    }
}

impl Default for ClutterRemovalConfig {
    fn default() -> Self {
        Self {
            enable: true,
            history: Self::default_history(),
            var_threshold: Self::default_var_threshold(),
            detect_shadows: false,
        }
    }
}

/// The `preprocessing` config block (spec.md §6). If `preset` is present,
/// every other key is ignored. An entirely empty config yields the
/// identity chain.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreprocessConfig {
    pub preset: Option<String>,
    pub contrast_enhance: Option<ContrastEnhanceConfig>,
    pub edge_enhance: Option<EdgeEnhanceConfig>,
    pub denoise: Option<DenoiseConfig>,
    pub deblur: Option<DeblurConfig>,
    pub clutter_removal: Option<ClutterRemovalConfig>,
}

impl PreprocessConfig {
    /// Build the runtime [`Chain`] this config describes (spec.md §4.B).
    pub fn build_chain(&self) -> Chain {
        if let Some(name) = &self.preset {
            return match Preset::from_name(name) {
                Some(preset) => preset.build_chain(),
                None => {
                    tracing::warn!(preset = %name, "unrecognized preset name, falling back to identity chain");
                    Chain::identity()
                }
            };
        }

        let mut ops: Vec<Box<dyn Operator>> = Vec::new();
        if let Some(c) = &self.contrast_enhance {
            if c.enable {
                ops.push(Box::new(GammaContrast::new(c.gamma)));
            }
        }
        if let Some(c) = &self.edge_enhance {
            if c.enable {
                ops.push(Box::new(UnsharpMask::new(c.ksize, c.amount)));
            }
        }
        if let Some(c) = &self.denoise {
            if c.enable {
                ops.push(Box::new(GaussianBlur::new(c.ksize, c.sigma)));
            }
        }
        if let Some(c) = &self.deblur {
            if c.enable {
                ops.push(Box::new(LaplacianSharpen::new(c.alpha, c.ks)));
            }
        }
        if let Some(c) = &self.clutter_removal {
            if c.enable {
                ops.push(Box::new(ClutterRemoval::new(c.history, c.var_threshold, c.detect_shadows)));
            }
        }
        Chain::new(ops)
    }
}

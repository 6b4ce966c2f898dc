use crate::chain::Chain;
use crate::clutter::ClutterRemoval;
use crate::gamma::GammaContrast;
use crate::gauss::GaussianBlur;
use crate::laplacian::LaplacianSharpen;
use crate::operator::Operator;
use crate::unsharp::UnsharpMask;

/// The closed set of fixed preprocessing presets (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Normal,
    Night,
    Fog,
    Motion,
    Ir,
}

impl Preset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Normal" => Some(Preset::Normal),
            "Night" => Some(Preset::Night),
            "Fog" => Some(Preset::Fog),
            "Motion" => Some(Preset::Motion),
            "IR" => Some(Preset::Ir),
            _ => None,
        }
    }

    /// Build the fixed operator chain for this preset (spec.md §6).
    pub fn build_chain(&self) -> Chain {
        let ops: Vec<Box<dyn Operator>> = match self {
            Preset::Normal => vec![Box::new(GammaContrast::new(0.80))],
            Preset::Night => vec![
                Box::new(GammaContrast::new(0.65)),
                Box::new(GaussianBlur::new(3, 0.0)),
                Box::new(UnsharpMask::new(5, 1.0)),
            ],
            Preset::Fog => vec![
                Box::new(GammaContrast::new(0.75)),
                Box::new(UnsharpMask::new(5, 1.8)),
            ],
            Preset::Motion => vec![
                Box::new(GammaContrast::new(0.80)),
                Box::new(LaplacianSharpen::new(1.3, 3)),
                Box::new(UnsharpMask::new(5, 0.7)),
            ],
            Preset::Ir => vec![
                Box::new(GammaContrast::new(0.80)),
                Box::new(ClutterRemoval::new(50, 25.0, false)),
                Box::new(UnsharpMask::new(5, 1.0)),
            ],
        };
        Chain::new(ops)
    }
}

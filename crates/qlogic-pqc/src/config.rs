//! Validated training configuration for the three circuit variants.
//!
//! Every config is checked once, when it is built or deserialized, and is
//! immutable afterwards. YAML documents carry a `variant` tag and the fields
//! of that variant side by side:
//!
//! ```yaml
//! variant: entangled
//! learning_rate: 0.1
//! max_steps: 800
//! num_blocks: 4
//! seed: 13
//! entangler: CZ
//! entangle_order: [1, 0]
//! mirror_entangler: false
//! ```
//!
//! Missing fields fall back to the [`PqcConfig`] defaults.

use std::f64::consts::PI;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use qlogic_ir::StandardGate;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::gates::NUM_INPUTS;

// =============================================================================
// Enumerated settings
// =============================================================================

/// Circuit architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Basis encoding, rotations only.
    Plain,
    /// Angle encoding with fixed controlled rotations.
    Angle,
    /// Basis encoding, data re-uploading and a configurable entangler.
    Entangled,
}

impl Variant {
    /// All variants.
    pub const ALL: [Variant; 3] = [Variant::Plain, Variant::Angle, Variant::Entangled];

    /// Lower-case identifier, as used in YAML and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Plain => "plain",
            Variant::Angle => "angle",
            Variant::Entangled => "entangled",
        }
    }

    /// Capitalized label for report headers.
    pub fn label(self) -> &'static str {
        match self {
            Variant::Plain => "Plain",
            Variant::Angle => "Angle",
            Variant::Entangled => "Entangled",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownVariant(s.to_string()))
    }
}

/// Rotation axis used by angle encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EncodingAxis {
    /// Rotation about X.
    Rx,
    /// Rotation about Y.
    Ry,
    /// Rotation about Z.
    Rz,
}

impl EncodingAxis {
    /// The rotation gate about this axis.
    pub fn gate(self, angle: f64) -> StandardGate {
        match self {
            EncodingAxis::Rx => StandardGate::Rx(angle),
            EncodingAxis::Ry => StandardGate::Ry(angle),
            EncodingAxis::Rz => StandardGate::Rz(angle),
        }
    }

    /// Upper-case axis name.
    pub fn name(self) -> &'static str {
        match self {
            EncodingAxis::Rx => "RX",
            EncodingAxis::Ry => "RY",
            EncodingAxis::Rz => "RZ",
        }
    }
}

impl fmt::Display for EncodingAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncodingAxis {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RX" => Ok(EncodingAxis::Rx),
            "RY" => Ok(EncodingAxis::Ry),
            "RZ" => Ok(EncodingAxis::Rz),
            _ => Err(ConfigError::UnknownAxis(s.to_string())),
        }
    }
}

impl TryFrom<String> for EncodingAxis {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EncodingAxis> for String {
    fn from(axis: EncodingAxis) -> Self {
        axis.name().to_string()
    }
}

/// Two-qubit entangling gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Entangler {
    /// Controlled-NOT.
    Cnot,
    /// Controlled-Z.
    Cz,
    /// iSWAP.
    ISwap,
    /// SWAP.
    Swap,
}

impl Entangler {
    /// The IR gate for this entangler.
    pub fn gate(self) -> StandardGate {
        match self {
            Entangler::Cnot => StandardGate::CX,
            Entangler::Cz => StandardGate::CZ,
            Entangler::ISwap => StandardGate::ISwap,
            Entangler::Swap => StandardGate::Swap,
        }
    }

    /// Upper-case entangler name.
    pub fn name(self) -> &'static str {
        match self {
            Entangler::Cnot => "CNOT",
            Entangler::Cz => "CZ",
            Entangler::ISwap => "ISWAP",
            Entangler::Swap => "SWAP",
        }
    }
}

impl fmt::Display for Entangler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Entangler {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CNOT" | "CX" => Ok(Entangler::Cnot),
            "CZ" => Ok(Entangler::Cz),
            "ISWAP" => Ok(Entangler::ISwap),
            "SWAP" => Ok(Entangler::Swap),
            _ => Err(ConfigError::UnknownEntangler(s.to_string())),
        }
    }
}

impl TryFrom<String> for Entangler {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Entangler> for String {
    fn from(entangler: Entangler) -> Self {
        entangler.name().to_string()
    }
}

// =============================================================================
// Base configuration
// =============================================================================

/// Settings shared by every variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PqcConfigBuilder")]
pub struct PqcConfig {
    learning_rate: f64,
    max_steps: usize,
    seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    shots: Option<u32>,
    convergence_tol: f64,
    num_blocks: usize,
}

impl Default for PqcConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.2,
            max_steps: 400,
            seed: 7,
            shots: None,
            convergence_tol: 1e-3,
            num_blocks: 2,
        }
    }
}

impl PqcConfig {
    /// Start from the defaults.
    pub fn builder() -> PqcConfigBuilder {
        PqcConfigBuilder::default()
    }

    /// Optimizer step size.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Upper bound on optimization steps.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Seed for parameter initialization and shot sampling.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shot count; `None` means exact expectation values.
    pub fn shots(&self) -> Option<u32> {
        self.shots
    }

    /// Training stops once a step's loss is strictly below this.
    pub fn convergence_tol(&self) -> f64 {
        self.convergence_tol
    }

    /// Number of ansatz blocks.
    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }
}

/// Builder for [`PqcConfig`]. Doubles as its unvalidated serde form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PqcConfigBuilder {
    learning_rate: f64,
    max_steps: usize,
    seed: u64,
    shots: Option<u32>,
    convergence_tol: f64,
    num_blocks: usize,
}

impl Default for PqcConfigBuilder {
    fn default() -> Self {
        PqcConfig::default().into()
    }
}

impl From<PqcConfig> for PqcConfigBuilder {
    fn from(c: PqcConfig) -> Self {
        Self {
            learning_rate: c.learning_rate,
            max_steps: c.max_steps,
            seed: c.seed,
            shots: c.shots,
            convergence_tol: c.convergence_tol,
            num_blocks: c.num_blocks,
        }
    }
}

impl PqcConfigBuilder {
    /// Set the learning rate.
    #[must_use]
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the step limit.
    #[must_use]
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the shot count.
    #[must_use]
    pub fn shots(mut self, shots: Option<u32>) -> Self {
        self.shots = shots;
        self
    }

    /// Set the convergence tolerance.
    #[must_use]
    pub fn convergence_tol(mut self, convergence_tol: f64) -> Self {
        self.convergence_tol = convergence_tol;
        self
    }

    /// Set the number of blocks.
    #[must_use]
    pub fn num_blocks(mut self, num_blocks: usize) -> Self {
        self.num_blocks = num_blocks;
        self
    }

    /// Validate and build.
    pub fn build(self) -> ConfigResult<PqcConfig> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::InvalidLearningRate(self.learning_rate));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::InvalidMaxSteps(self.max_steps));
        }
        if self.num_blocks == 0 {
            return Err(ConfigError::InvalidNumBlocks(self.num_blocks));
        }
        if self.shots == Some(0) {
            return Err(ConfigError::InvalidShots);
        }
        if !(self.convergence_tol.is_finite() && self.convergence_tol >= 0.0) {
            return Err(ConfigError::InvalidTolerance(self.convergence_tol));
        }
        Ok(PqcConfig {
            learning_rate: self.learning_rate,
            max_steps: self.max_steps,
            seed: self.seed,
            shots: self.shots,
            convergence_tol: self.convergence_tol,
            num_blocks: self.num_blocks,
        })
    }
}

impl TryFrom<PqcConfigBuilder> for PqcConfig {
    type Error = ConfigError;

    fn try_from(builder: PqcConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

/// Forwards the base setters of a variant builder to its inner [`PqcConfigBuilder`].
macro_rules! base_setters {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Set `", stringify!($name), "` on the base config.")]
            #[must_use]
            pub fn $name(mut self, value: $ty) -> Self {
                self.base = self.base.$name(value);
                self
            }
        )*
    };
}

// =============================================================================
// Angle-encoded variant
// =============================================================================

/// Settings for the angle-encoded variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AngleConfigBuilder")]
pub struct AngleConfig {
    #[serde(flatten)]
    base: PqcConfig,
    angle_axis: EncodingAxis,
    angle_scale: f64,
    angle_bias: f64,
}

impl Default for AngleConfig {
    fn default() -> Self {
        Self {
            base: PqcConfig::default(),
            angle_axis: EncodingAxis::Ry,
            angle_scale: PI,
            angle_bias: 0.0,
        }
    }
}

impl AngleConfig {
    /// Start from the defaults.
    pub fn builder() -> AngleConfigBuilder {
        AngleConfigBuilder::default()
    }

    /// Shared settings.
    pub fn base(&self) -> &PqcConfig {
        &self.base
    }

    /// Encoding rotation axis.
    pub fn axis(&self) -> EncodingAxis {
        self.angle_axis
    }

    /// Encoding angle per unit of input.
    pub fn scale(&self) -> f64 {
        self.angle_scale
    }

    /// Encoding angle offset.
    pub fn bias(&self) -> f64 {
        self.angle_bias
    }
}

/// Builder for [`AngleConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleConfigBuilder {
    #[serde(flatten)]
    base: PqcConfigBuilder,
    angle_axis: EncodingAxis,
    angle_scale: f64,
    angle_bias: f64,
}

impl Default for AngleConfigBuilder {
    fn default() -> Self {
        AngleConfig::default().into()
    }
}

impl From<AngleConfig> for AngleConfigBuilder {
    fn from(c: AngleConfig) -> Self {
        Self {
            base: c.base.into(),
            angle_axis: c.angle_axis,
            angle_scale: c.angle_scale,
            angle_bias: c.angle_bias,
        }
    }
}

impl AngleConfigBuilder {
    base_setters!(
        learning_rate: f64,
        max_steps: usize,
        seed: u64,
        shots: Option<u32>,
        convergence_tol: f64,
        num_blocks: usize,
    );

    /// Replace all base settings.
    #[must_use]
    pub fn base(mut self, base: PqcConfigBuilder) -> Self {
        self.base = base;
        self
    }

    /// Set the encoding axis.
    #[must_use]
    pub fn axis(mut self, axis: EncodingAxis) -> Self {
        self.angle_axis = axis;
        self
    }

    /// Set the encoding scale.
    #[must_use]
    pub fn scale(mut self, scale: f64) -> Self {
        self.angle_scale = scale;
        self
    }

    /// Set the encoding bias.
    #[must_use]
    pub fn bias(mut self, bias: f64) -> Self {
        self.angle_bias = bias;
        self
    }

    /// Validate and build.
    pub fn build(self) -> ConfigResult<AngleConfig> {
        let base = self.base.build()?;
        if !self.angle_scale.is_finite() {
            return Err(ConfigError::InvalidScale(self.angle_scale));
        }
        if !self.angle_bias.is_finite() {
            return Err(ConfigError::InvalidBias(self.angle_bias));
        }
        Ok(AngleConfig {
            base,
            angle_axis: self.angle_axis,
            angle_scale: self.angle_scale,
            angle_bias: self.angle_bias,
        })
    }
}

impl TryFrom<AngleConfigBuilder> for AngleConfig {
    type Error = ConfigError;

    fn try_from(builder: AngleConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

// =============================================================================
// Entangled variant
// =============================================================================

/// Settings for the entangled variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EntangledConfigBuilder")]
pub struct EntangledConfig {
    #[serde(flatten)]
    base: PqcConfig,
    entangler: Entangler,
    entangle_order: (usize, usize),
    mirror_entangler: bool,
}

impl Default for EntangledConfig {
    fn default() -> Self {
        Self {
            base: PqcConfig::default(),
            entangler: Entangler::Cnot,
            entangle_order: (0, 1),
            mirror_entangler: true,
        }
    }
}

impl EntangledConfig {
    /// Start from the defaults.
    pub fn builder() -> EntangledConfigBuilder {
        EntangledConfigBuilder::default()
    }

    /// Shared settings.
    pub fn base(&self) -> &PqcConfig {
        &self.base
    }

    /// Entangling gate.
    pub fn entangler(&self) -> Entangler {
        self.entangler
    }

    /// `(control, target)` wires of the entangler.
    pub fn entangle_order(&self) -> (usize, usize) {
        self.entangle_order
    }

    /// Whether the entangler is repeated with wires swapped.
    pub fn mirror(&self) -> bool {
        self.mirror_entangler
    }
}

/// Builder for [`EntangledConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntangledConfigBuilder {
    #[serde(flatten)]
    base: PqcConfigBuilder,
    entangler: Entangler,
    entangle_order: (usize, usize),
    mirror_entangler: bool,
}

impl Default for EntangledConfigBuilder {
    fn default() -> Self {
        EntangledConfig::default().into()
    }
}

impl From<EntangledConfig> for EntangledConfigBuilder {
    fn from(c: EntangledConfig) -> Self {
        Self {
            base: c.base.into(),
            entangler: c.entangler,
            entangle_order: c.entangle_order,
            mirror_entangler: c.mirror_entangler,
        }
    }
}

impl EntangledConfigBuilder {
    base_setters!(
        learning_rate: f64,
        max_steps: usize,
        seed: u64,
        shots: Option<u32>,
        convergence_tol: f64,
        num_blocks: usize,
    );

    /// Replace all base settings.
    #[must_use]
    pub fn base(mut self, base: PqcConfigBuilder) -> Self {
        self.base = base;
        self
    }

    /// Set the entangling gate.
    #[must_use]
    pub fn entangler(mut self, entangler: Entangler) -> Self {
        self.entangler = entangler;
        self
    }

    /// Set the `(control, target)` wires.
    #[must_use]
    pub fn entangle_order(mut self, control: usize, target: usize) -> Self {
        self.entangle_order = (control, target);
        self
    }

    /// Enable or disable the mirrored entangler.
    #[must_use]
    pub fn mirror(mut self, mirror: bool) -> Self {
        self.mirror_entangler = mirror;
        self
    }

    /// Validate and build.
    pub fn build(self) -> ConfigResult<EntangledConfig> {
        let base = self.base.build()?;
        let (control, target) = self.entangle_order;
        if control == target || control >= NUM_INPUTS || target >= NUM_INPUTS {
            return Err(ConfigError::InvalidEntangleOrder { control, target });
        }
        Ok(EntangledConfig {
            base,
            entangler: self.entangler,
            entangle_order: self.entangle_order,
            mirror_entangler: self.mirror_entangler,
        })
    }
}

impl TryFrom<EntangledConfigBuilder> for EntangledConfig {
    type Error = ConfigError;

    fn try_from(builder: EntangledConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

// =============================================================================
// Tagged union
// =============================================================================

/// Configuration for one of the three circuit variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum CircuitConfig {
    /// Basis encoding, rotations only.
    Plain(PqcConfig),
    /// Angle encoding.
    Angle(AngleConfig),
    /// Entangled with data re-uploading.
    Entangled(EntangledConfig),
}

impl Default for CircuitConfig {
    fn default() -> Self {
        CircuitConfig::Plain(PqcConfig::default())
    }
}

impl From<PqcConfig> for CircuitConfig {
    fn from(c: PqcConfig) -> Self {
        CircuitConfig::Plain(c)
    }
}

impl From<AngleConfig> for CircuitConfig {
    fn from(c: AngleConfig) -> Self {
        CircuitConfig::Angle(c)
    }
}

impl From<EntangledConfig> for CircuitConfig {
    fn from(c: EntangledConfig) -> Self {
        CircuitConfig::Entangled(c)
    }
}

impl CircuitConfig {
    /// Which circuit architecture this config selects.
    pub fn variant(&self) -> Variant {
        match self {
            CircuitConfig::Plain(_) => Variant::Plain,
            CircuitConfig::Angle(_) => Variant::Angle,
            CircuitConfig::Entangled(_) => Variant::Entangled,
        }
    }

    /// Settings shared by every variant.
    pub fn base(&self) -> &PqcConfig {
        match self {
            CircuitConfig::Plain(c) => c,
            CircuitConfig::Angle(c) => &c.base,
            CircuitConfig::Entangled(c) => &c.base,
        }
    }

    /// Parse and validate a YAML document.
    ///
    /// Keys that the selected variant does not define are rejected rather
    /// than silently replaced by defaults.
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let document: serde_yaml_ng::Value = serde_yaml_ng::from_str(yaml)?;
        reject_unknown_keys(&document)?;
        Ok(serde_yaml_ng::from_value(document)?)
    }

    /// Load and validate a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Apply overrides to the shared settings and re-validate.
    pub fn with_overrides(self, overrides: &ConfigOverrides) -> ConfigResult<Self> {
        Ok(match self {
            CircuitConfig::Plain(c) => {
                CircuitConfig::Plain(overrides.apply(c.into()).build()?)
            }
            CircuitConfig::Angle(c) => {
                let builder = AngleConfigBuilder::from(c);
                let base = overrides.apply(builder.base.clone());
                CircuitConfig::Angle(builder.base(base).build()?)
            }
            CircuitConfig::Entangled(c) => {
                let builder = EntangledConfigBuilder::from(c);
                let base = overrides.apply(builder.base.clone());
                CircuitConfig::Entangled(builder.base(base).build()?)
            }
        })
    }
}

const BASE_KEYS: [&str; 6] = [
    "learning_rate",
    "max_steps",
    "seed",
    "shots",
    "convergence_tol",
    "num_blocks",
];

impl Variant {
    /// YAML keys this variant adds to the shared ones.
    fn extra_keys(self) -> &'static [&'static str] {
        match self {
            Variant::Plain => &[],
            Variant::Angle => &["angle_axis", "angle_scale", "angle_bias"],
            Variant::Entangled => &["entangler", "entangle_order", "mirror_entangler"],
        }
    }
}

/// Unknown or missing tags are left for serde to report.
fn reject_unknown_keys(document: &serde_yaml_ng::Value) -> ConfigResult<()> {
    let (Some(fields), Some(variant)) = (
        document.as_mapping(),
        document
            .get("variant")
            .and_then(serde_yaml_ng::Value::as_str)
            .and_then(|name| name.parse::<Variant>().ok()),
    ) else {
        return Ok(());
    };
    for key in fields.keys() {
        let known = key.as_str().is_some_and(|k| {
            k == "variant" || BASE_KEYS.contains(&k) || variant.extra_keys().contains(&k)
        });
        if !known {
            let field = key
                .as_str()
                .map_or_else(|| format!("{key:?}"), str::to_owned);
            return Err(ConfigError::UnknownField { field, variant });
        }
    }
    Ok(())
}

/// Optional replacements for the shared settings, e.g. from command-line flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub learning_rate: Option<f64>,
    pub max_steps: Option<usize>,
    pub seed: Option<u64>,
    pub shots: Option<u32>,
    pub convergence_tol: Option<f64>,
    pub num_blocks: Option<usize>,
}

impl ConfigOverrides {
    fn apply(&self, mut builder: PqcConfigBuilder) -> PqcConfigBuilder {
        if let Some(v) = self.learning_rate {
            builder = builder.learning_rate(v);
        }
        if let Some(v) = self.max_steps {
            builder = builder.max_steps(v);
        }
        if let Some(v) = self.seed {
            builder = builder.seed(v);
        }
        if let Some(v) = self.shots {
            builder = builder.shots(Some(v));
        }
        if let Some(v) = self.convergence_tol {
            builder = builder.convergence_tol(v);
        }
        if let Some(v) = self.num_blocks {
            builder = builder.num_blocks(v);
        }
        builder
    }
}

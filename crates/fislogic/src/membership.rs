//! Membership function shapes.
//!
//! Every shape maps `(io, coefficients)` to a degree. Conventional shapes
//! read `io[0].value` and return a degree in `[0, 1]`. Sugeno consequents
//! (`Constant`, `Linear`) return a crisp value, and Tsukamoto consequents
//! are inverse functions: they read a rule strength from `io[0].value` and
//! return the point of the output universe `[io[0].min, io[0].max]` whose
//! membership equals it.

use std::f64::consts::PI;
use std::slice;

use crate::defuzz::Architecture;
use crate::error::IoKind;
use crate::io::FisIo;
use crate::operators::bound;

/// Caller supplied evaluator. Receives the same arguments as the builtin
/// shapes: the io it is attached to (all inputs for Sugeno consequents)
/// and the coefficient slice.
///
/// A Tsukamoto consequent is evaluated as an inverse: it gets a single io
/// carrying the output range whose `value` is the firing strength of the
/// rule, and must return the crisp output reached at that strength.
pub type CustomShapeFn = fn(&[FisIo], &[f64]) -> f64;

/// Membership function shape.
///
/// Coefficients are listed in the order the shape reads them.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    /// `[a, b, c]`: feet at `a` and `c`, peak at `b`
    Triangular,
    /// `[a, b, c, d]`: feet at `a` and `d`, shoulders at `b` and `c`
    Trapezoidal,
    /// `[a, b, c]`: width, slope, center
    GeneralizedBell,
    /// `[sigma, c]`
    Gaussian,
    /// `[sigma1, c1, sigma2, c2]`: left and right Gaussian flanks
    Gaussian2,
    /// `[a, c]`: slope and inflection point
    Sigmoid,
    /// `[a1, c1, a2, c2]`: `|sig1 - sig2|`
    DifferenceSigmoid,
    /// `[a1, c1, a2, c2]`: `sig1 * sig2`
    ProductSigmoid,
    /// `[a, b, c, d]`: S rising over `[a, b]`, Z falling over `[c, d]`
    Pi,
    /// `[a, b]`: smooth step from 0 at `a` to 1 at `b`
    S,
    /// `[a, b]`: smooth step from 1 at `a` to 0 at `b`
    Z,
    /// `[a]`
    Singleton,
    /// `[i, e]`: inflection and end point
    Concave,
    /// `[w, c]`: width and center
    Spike,
    /// `[a, b]`: linear ramp from 0 at `a` to 1 at `b`
    LinearS,
    /// `[a, b]`: linear ramp from 1 at `a` to 0 at `b`
    LinearZ,
    /// `[start, end]`
    Rectangle,
    /// `[c, w]`: center and width
    Cosine,
    /// `[k]`
    Constant,
    /// `[c1, .., cn, c0]`: `Σ ci·xi + c0` over all inputs
    Linear,
    /// `[a, b]`: inverse of a linear ramp
    TsukamotoLinearS,
    /// `[a, b]`: inverse of a falling linear ramp
    TsukamotoLinearZ,
    /// `[i, e]`: inverse of [`Shape::Concave`]
    TsukamotoConcave,
    /// `[a, c]`: inverse of [`Shape::Sigmoid`]
    TsukamotoSigmoid,
    /// `[a, b]`: inverse of [`Shape::S`]
    TsukamotoS,
    /// `[a, b]`: inverse of [`Shape::Z`]
    TsukamotoZ,
    Custom(CustomShapeFn),
}

impl Shape {
    /// Every builtin shape.
    pub const BUILTIN: [Shape; 26] = [
        Shape::Triangular,
        Shape::Trapezoidal,
        Shape::GeneralizedBell,
        Shape::Gaussian,
        Shape::Gaussian2,
        Shape::Sigmoid,
        Shape::DifferenceSigmoid,
        Shape::ProductSigmoid,
        Shape::Pi,
        Shape::S,
        Shape::Z,
        Shape::Singleton,
        Shape::Concave,
        Shape::Spike,
        Shape::LinearS,
        Shape::LinearZ,
        Shape::Rectangle,
        Shape::Cosine,
        Shape::Constant,
        Shape::Linear,
        Shape::TsukamotoLinearS,
        Shape::TsukamotoLinearZ,
        Shape::TsukamotoConcave,
        Shape::TsukamotoSigmoid,
        Shape::TsukamotoS,
        Shape::TsukamotoZ,
    ];

    /// Number of coefficients the shape reads.
    pub fn arity(self, inputs: usize) -> usize {
        match self {
            Shape::Singleton | Shape::Constant => 1,
            Shape::Gaussian
            | Shape::Sigmoid
            | Shape::S
            | Shape::Z
            | Shape::Concave
            | Shape::Spike
            | Shape::LinearS
            | Shape::LinearZ
            | Shape::Rectangle
            | Shape::Cosine
            | Shape::TsukamotoLinearS
            | Shape::TsukamotoLinearZ
            | Shape::TsukamotoConcave
            | Shape::TsukamotoSigmoid
            | Shape::TsukamotoS
            | Shape::TsukamotoZ => 2,
            Shape::Triangular | Shape::GeneralizedBell => 3,
            Shape::Trapezoidal
            | Shape::Gaussian2
            | Shape::DifferenceSigmoid
            | Shape::ProductSigmoid
            | Shape::Pi => 4,
            Shape::Linear => inputs + 1,
            Shape::Custom(_) => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Triangular => "trimf",
            Shape::Trapezoidal => "trapmf",
            Shape::GeneralizedBell => "gbellmf",
            Shape::Gaussian => "gaussmf",
            Shape::Gaussian2 => "gauss2mf",
            Shape::Sigmoid => "sigmf",
            Shape::DifferenceSigmoid => "dsigmf",
            Shape::ProductSigmoid => "psigmf",
            Shape::Pi => "pimf",
            Shape::S => "smf",
            Shape::Z => "zmf",
            Shape::Singleton => "singletonmf",
            Shape::Concave => "concavemf",
            Shape::Spike => "spikemf",
            Shape::LinearS => "linsmf",
            Shape::LinearZ => "linzmf",
            Shape::Rectangle => "rectmf",
            Shape::Cosine => "cosmf",
            Shape::Constant => "constantmf",
            Shape::Linear => "linearmf",
            Shape::TsukamotoLinearS => "tlinsmf",
            Shape::TsukamotoLinearZ => "tlinzmf",
            Shape::TsukamotoConcave => "tconcavemf",
            Shape::TsukamotoSigmoid => "tsigmf",
            Shape::TsukamotoS => "tsmf",
            Shape::TsukamotoZ => "tzmf",
            Shape::Custom(_) => "custom",
        }
    }

    /// Shapes usable on inputs and Mamdani outputs.
    pub fn is_conventional(self) -> bool {
        !matches!(
            self,
            Shape::Constant | Shape::Linear | Shape::Custom(_)
        ) && !self.is_tsukamoto()
    }

    pub fn is_tsukamoto(self) -> bool {
        matches!(
            self,
            Shape::TsukamotoLinearS
                | Shape::TsukamotoLinearZ
                | Shape::TsukamotoConcave
                | Shape::TsukamotoSigmoid
                | Shape::TsukamotoS
                | Shape::TsukamotoZ
        )
    }

    /// Whether the shape may be attached to `kind` in a system of the given
    /// architecture.
    pub fn allowed_for(self, kind: IoKind, architecture: Architecture) -> bool {
        if let Shape::Custom(_) = self {
            return true;
        }
        match (kind, architecture) {
            (IoKind::Input, _) => self.is_conventional() || matches!(self, Shape::Constant),
            (IoKind::Output, Architecture::Mamdani) => self.is_conventional(),
            (IoKind::Output, Architecture::Sugeno) => {
                matches!(self, Shape::Constant | Shape::Linear)
            }
            (IoKind::Output, Architecture::Tsukamoto) => self.is_tsukamoto(),
        }
    }

    /// Evaluate the shape. Returns 0 when fewer coefficients than
    /// [`Shape::arity`] are supplied or `io` is empty.
    pub fn evaluate(self, io: &[FisIo], p: &[f64]) -> f64 {
        if p.len() < self.arity(io.len()) {
            return 0.0;
        }
        if let Shape::Custom(f) = self {
            return f(io, p);
        }
        if let Shape::Linear = self {
            let dot: f64 = io.iter().zip(p).map(|(input, c)| input.value * c).sum();
            return dot + p[io.len()];
        }
        let Some(first) = io.first() else {
            return 0.0;
        };
        let x = first.value;

        match self {
            Shape::Triangular => triangular(x, p[0], p[1], p[2]),
            Shape::Trapezoidal => {
                let rise = ((x - p[0]) / (p[1] - p[0])).min(1.0);
                bound(rise.min((p[3] - x) / (p[3] - p[2])), 0.0, 1.0)
            }
            Shape::GeneralizedBell => {
                1.0 / (1.0 + ((x - p[2]) / p[0]).abs().powf(2.0 * p[1]))
            }
            Shape::Gaussian => gaussian(x, p[0], p[1]),
            Shape::Gaussian2 => {
                let left = if x <= p[1] { gaussian(x, p[0], p[1]) } else { 1.0 };
                let right = if x >= p[3] { gaussian(x, p[2], p[3]) } else { 1.0 };
                left * right
            }
            Shape::Sigmoid => sigmoid(x, p[0], p[1]),
            Shape::DifferenceSigmoid => (sigmoid(x, p[0], p[1]) - sigmoid(x, p[2], p[3])).abs(),
            Shape::ProductSigmoid => (sigmoid(x, p[0], p[1]) * sigmoid(x, p[2], p[3])).abs(),
            Shape::Pi => (s_curve(x, p[0], p[1]) * z_curve(x, p[2], p[3])).abs(),
            Shape::S => s_curve(x, p[0], p[1]),
            Shape::Z => z_curve(x, p[0], p[1]),
            Shape::Singleton => {
                if (x - p[0]).abs() <= f64::EPSILON {
                    1.0
                } else {
                    0.0
                }
            }
            Shape::Concave => concave(x, p[0], p[1]),
            Shape::Spike => (-(10.0 * (x - p[1]) / p[0]).abs()).exp(),
            Shape::LinearS => linear_s(x, p[0], p[1]),
            Shape::LinearZ => linear_z(x, p[0], p[1]),
            Shape::Rectangle => {
                if x >= p[0] && x <= p[1] {
                    1.0
                } else {
                    0.0
                }
            }
            Shape::Cosine => {
                let (c, w) = (p[0], p[1]);
                if x < c - 0.5 * w || x > c + 0.5 * w {
                    0.0
                } else {
                    0.5 * (1.0 + (2.0 / w * PI * (x - c)).cos())
                }
            }
            Shape::Constant => p[0],
            Shape::TsukamotoLinearS | Shape::TsukamotoLinearZ => p[0] + (p[1] - p[0]) * x,
            Shape::TsukamotoConcave => (p[0] - p[1]) / x + 2.0 * p[1] - p[0],
            Shape::TsukamotoSigmoid => {
                let (a, c) = (p[0], p[1]);
                let (rising_end, falling_end) = if a >= 0.0 {
                    (first.max, first.min)
                } else {
                    (first.min, first.max)
                };
                if x >= 1.0 {
                    rising_end
                } else if x <= 0.0 {
                    falling_end
                } else {
                    c - ((1.0 / x) - 1.0).ln() / a
                }
            }
            Shape::TsukamotoS => s_inverse(x, p[0], p[1]),
            Shape::TsukamotoZ => s_inverse(1.0 - x, p[0], p[1]),
            Shape::Linear | Shape::Custom(_) => 0.0,
        }
    }
}

fn triangular(x: f64, a: f64, b: f64, c: f64) -> f64 {
    let rise = (x - a) / (b - a);
    let fall = (c - x) / (c - b);
    bound(rise.min(fall), 0.0, 1.0)
}

fn gaussian(x: f64, sigma: f64, c: f64) -> f64 {
    let t = (x - c) / sigma;
    (-0.5 * t * t).exp()
}

fn sigmoid(x: f64, a: f64, c: f64) -> f64 {
    1.0 / (1.0 + (-a * (x - c)).exp())
}

fn s_curve(x: f64, a: f64, b: f64) -> f64 {
    if x <= a {
        0.0
    } else if x >= b {
        1.0
    } else if x <= 0.5 * (a + b) {
        let t = (x - a) / (b - a);
        2.0 * t * t
    } else {
        let t = (x - b) / (b - a);
        1.0 - 2.0 * t * t
    }
}

fn z_curve(x: f64, a: f64, b: f64) -> f64 {
    1.0 - s_curve(x, a, b)
}

fn s_inverse(y: f64, a: f64, b: f64) -> f64 {
    let y = bound(y, 0.0, 1.0);
    if y <= 0.5 {
        a + (b - a) * (0.5 * y).sqrt()
    } else {
        b - (b - a) * (0.5 * (1.0 - y)).sqrt()
    }
}

fn concave(x: f64, i: f64, e: f64) -> f64 {
    if i <= e && x < e {
        (e - i) / (2.0 * e - i - x)
    } else if i > e && x > e {
        (i - e) / (-2.0 * e + i + x)
    } else {
        1.0
    }
}

fn linear_s(x: f64, a: f64, b: f64) -> f64 {
    if a < b {
        bound((x - a) / (b - a), 0.0, 1.0)
    } else if a == b {
        if x < a {
            0.0
        } else {
            1.0
        }
    } else {
        0.0
    }
}

fn linear_z(x: f64, a: f64, b: f64) -> f64 {
    if a < b {
        bound((b - x) / (b - a), 0.0, 1.0)
    } else if a == b {
        if x < a {
            1.0
        } else {
            0.0
        }
    } else {
        0.0
    }
}

/// A membership function bound to one input or output.
#[derive(Debug, Clone, Copy)]
pub struct MembershipFunction<'p> {
    shape: Option<Shape>,
    coefficients: &'p [f64],
    height: f64,
    io: usize,
    degree: f64,
}

impl Default for MembershipFunction<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> MembershipFunction<'p> {
    /// An unconfigured function; evaluates to 0 until configured.
    pub const fn new() -> Self {
        Self {
            shape: None,
            coefficients: &[],
            height: 1.0,
            io: 0,
            degree: 0.0,
        }
    }

    pub(crate) fn configure(&mut self, io: usize, shape: Shape, coefficients: &'p [f64], height: f64) {
        self.shape = Some(shape);
        self.coefficients = coefficients;
        self.height = bound(height, 0.0, 1.0);
        self.io = io;
        self.degree = 0.0;
    }

    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    pub fn io(&self) -> usize {
        self.io
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Degree cached by the last fuzzification.
    pub fn degree(&self) -> f64 {
        self.degree
    }

    /// Evaluate against the owning input and cache the scaled degree.
    pub(crate) fn fuzzify(&mut self, inputs: &[FisIo]) {
        self.degree = match inputs.get(self.io..=self.io) {
            Some(io) => self.height * self.evaluate(io),
            None => 0.0,
        };
    }

    /// Height-scaled degree at the current value of `io`.
    pub(crate) fn evaluate_scaled(&self, io: &FisIo) -> f64 {
        self.height * self.evaluate(slice::from_ref(io))
    }

    /// Raw shape value, without height.
    pub(crate) fn evaluate(&self, io: &[FisIo]) -> f64 {
        match self.shape {
            Some(shape) => shape.evaluate(io, self.coefficients),
            None => 0.0,
        }
    }
}

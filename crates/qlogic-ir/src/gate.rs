//! The gate set.

/// Gates the qlogic ansätze are built from.
///
/// Angles are plain radians. A trainable circuit is rebuilt from the
/// parameter tensor every time it is evaluated, so no symbolic parameters
/// are needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StandardGate {
    X,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    /// CNOT; first operand is the control.
    CX,
    CZ,
    Swap,
    ISwap,
    /// Controlled X rotation; first operand is the control.
    CRx(f64),
}

impl StandardGate {
    /// Lowercase mnemonic.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Rx(_) => "rx",
            Self::Ry(_) => "ry",
            Self::Rz(_) => "rz",
            Self::CX => "cx",
            Self::CZ => "cz",
            Self::Swap => "swap",
            Self::ISwap => "iswap",
            Self::CRx(_) => "crx",
        }
    }

    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Self::X | Self::Rx(_) | Self::Ry(_) | Self::Rz(_) => 1,
            _ => 2,
        }
    }

    /// Rotation angle of the parameterized gates.
    pub fn angle(&self) -> Option<f64> {
        match *self {
            Self::Rx(theta) | Self::Ry(theta) | Self::Rz(theta) | Self::CRx(theta) => Some(theta),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn arity() {
        assert_eq!(StandardGate::X.num_qubits(), 1);
        assert_eq!(StandardGate::Rz(0.0).num_qubits(), 1);
        assert_eq!(StandardGate::ISwap.num_qubits(), 2);
        assert_eq!(StandardGate::CRx(PI).num_qubits(), 2);
    }

    #[test]
    fn only_rotations_carry_angles() {
        assert_eq!(StandardGate::X.angle(), None);
        assert_eq!(StandardGate::CZ.angle(), None);
        assert_eq!(StandardGate::Ry(0.3).angle(), Some(0.3));
        assert_eq!(StandardGate::CRx(PI / 2.0).angle(), Some(PI / 2.0));
    }

    #[test]
    fn mnemonics() {
        assert_eq!(StandardGate::ISwap.name(), "iswap");
        assert_eq!(StandardGate::CX.name(), "cx");
        assert_eq!(StandardGate::Rz(0.0).name(), "rz");
    }
}

//! Fixed-width text rendering of circuits.
//!
//! Each instruction is placed in the leftmost column that is free on every
//! wire it spans. Qubit wires are drawn with `─`, classical wires with `═`,
//! and the rows between wires carry vertical connectors.
//!
//! ```text
//! q0: ─X──■──M─
//!         │  ║
//! q1: ────X──╫─
//!            ║
//! c0: ═══════╩═
//! ```

use std::fmt::Write as _;

use crate::circuit::Circuit;
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};

/// Render a circuit as text, folding into segments at most `fold` columns wide.
///
/// A `fold` of zero disables folding.
pub fn draw(circuit: &Circuit, fold: usize) -> String {
    TextDrawer::new(fold).draw(circuit)
}

/// Text renderer for circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextDrawer {
    fold: usize,
}

impl Default for TextDrawer {
    fn default() -> Self {
        Self { fold: 80 }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Wire,
    Label(String),
    Cross(char),
}

impl Cell {
    fn text(&self) -> Option<String> {
        match self {
            Cell::Wire => None,
            Cell::Label(s) => Some(s.clone()),
            Cell::Cross(c) => Some(c.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct Column {
    cells: Vec<Cell>,
    /// Connector drawn in the gap below wire `i`.
    links: Vec<Option<char>>,
}

impl Column {
    fn new(num_wires: usize) -> Self {
        Self {
            cells: vec![Cell::Wire; num_wires],
            links: vec![None; num_wires.saturating_sub(1)],
        }
    }

    fn width(&self) -> usize {
        self.cells
            .iter()
            .filter_map(Cell::text)
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(1)
    }
}

/// Where an instruction lands, in wire indices (qubits first, then clbits).
struct Placement {
    lo: usize,
    hi: usize,
    marks: Vec<(usize, String)>,
    link: char,
    double: bool,
}

impl TextDrawer {
    /// Create a drawer with the given fold width.
    pub fn new(fold: usize) -> Self {
        Self { fold }
    }

    /// The fold width.
    pub fn fold(&self) -> usize {
        self.fold
    }

    /// Render a circuit.
    pub fn draw(&self, circuit: &Circuit) -> String {
        let num_qubits = circuit.num_qubits();
        let num_wires = num_qubits + circuit.num_clbits();
        if num_wires == 0 {
            return String::new();
        }

        let columns = layout(circuit, num_qubits, num_wires);
        let labels: Vec<String> = (0..num_wires)
            .map(|w| {
                if w < num_qubits {
                    format!("q{w}: ")
                } else {
                    format!("c{}: ", w - num_qubits)
                }
            })
            .collect();
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        let mut out = String::new();
        for (i, segment) in self.segments(&columns, label_width).iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            render_segment(&mut out, segment, &labels, label_width, num_qubits);
        }
        out
    }

    fn segments<'a>(&self, columns: &'a [Column], label_width: usize) -> Vec<&'a [Column]> {
        if self.fold == 0 || columns.is_empty() {
            return vec![columns];
        }

        let mut segments = Vec::new();
        let mut start = 0;
        let mut used = label_width;
        for (i, col) in columns.iter().enumerate() {
            let w = col.width() + 2;
            if i > start && used + w > self.fold {
                segments.push(&columns[start..i]);
                start = i;
                used = label_width;
            }
            used += w;
        }
        segments.push(&columns[start..]);
        segments
    }
}

fn layout(circuit: &Circuit, num_qubits: usize, num_wires: usize) -> Vec<Column> {
    let mut columns: Vec<Column> = Vec::new();
    let mut next_free = vec![0usize; num_wires];

    for inst in circuit.instructions() {
        let Some(p) = place(inst, num_qubits, num_wires) else {
            continue;
        };

        let col = next_free[p.lo..=p.hi].iter().copied().max().unwrap_or(0);
        if col == columns.len() {
            columns.push(Column::new(num_wires));
        }
        let column = &mut columns[col];

        for w in p.lo..=p.hi {
            column.cells[w] = match p.marks.iter().find(|(m, _)| *m == w) {
                Some((_, text)) => Cell::Label(text.clone()),
                None => Cell::Cross(crossing(w >= num_qubits, p.double)),
            };
            next_free[w] = col + 1;
        }
        for gap in p.lo..p.hi {
            column.links[gap] = Some(p.link);
        }
    }

    columns
}

fn crossing(classical: bool, double: bool) -> char {
    match (classical, double) {
        (false, false) => '┼',
        (false, true) => '╫',
        (true, false) => '╪',
        (true, true) => '╬',
    }
}

fn place(inst: &Instruction, num_qubits: usize, num_wires: usize) -> Option<Placement> {
    let qubit_wire = |i: usize| (i < num_qubits).then_some(i);
    let qubits: Vec<usize> = inst
        .qubits
        .iter()
        .filter_map(|q| qubit_wire(q.index()))
        .collect();
    if qubits.is_empty() {
        return None;
    }

    let (marks, link, double): (Vec<(usize, String)>, char, bool) = match &inst.kind {
        InstructionKind::Gate(gate) => (gate_marks(gate, &qubits), '│', false),
        InstructionKind::Measure => {
            let mut marks: Vec<(usize, String)> =
                qubits.iter().map(|&q| (q, "M".to_string())).collect();
            marks.extend(
                inst.clbits
                    .iter()
                    .map(|c| num_qubits + c.index())
                    .filter(|&w| w < num_wires)
                    .map(|w| (w, "╩".to_string())),
            );
            (marks, '║', true)
        }
        InstructionKind::Barrier => (
            qubits.iter().map(|&q| (q, "░".to_string())).collect(),
            '░',
            false,
        ),
    };

    let lo = marks.iter().map(|(w, _)| *w).min()?;
    let hi = marks.iter().map(|(w, _)| *w).max()?;
    Some(Placement {
        lo,
        hi,
        marks,
        link,
        double,
    })
}

fn gate_marks(gate: &StandardGate, qubits: &[usize]) -> Vec<(usize, String)> {
    let control = "■".to_string();
    match (gate, qubits) {
        (StandardGate::CX, [c, t]) => vec![(*c, control), (*t, "X".into())],
        (StandardGate::CZ, [c, t]) => vec![(*c, control.clone()), (*t, control)],
        (StandardGate::CRx(theta), [c, t]) => {
            vec![(*c, control), (*t, format!("RX({theta:.2})"))]
        }
        (StandardGate::Swap, [a, b]) => vec![(*a, "x".into()), (*b, "x".into())],
        (StandardGate::ISwap, [a, b]) => vec![(*a, "iSWAP".into()), (*b, "iSWAP".into())],
        (gate, _) => {
            let label = match gate.angle() {
                Some(theta) => format!("{}({theta:.2})", gate.name().to_uppercase()),
                None => gate.name().to_uppercase(),
            };
            qubits.iter().map(|&q| (q, label.clone())).collect()
        }
    }
}

fn centered(out: &mut String, text: &str, width: usize, fill: char) {
    let len = text.chars().count();
    let left = width.saturating_sub(len) / 2;
    let right = width.saturating_sub(len + left);
    out.extend(std::iter::repeat_n(fill, left));
    out.push_str(text);
    out.extend(std::iter::repeat_n(fill, right));
}

fn render_segment(
    out: &mut String,
    columns: &[Column],
    labels: &[String],
    label_width: usize,
    num_qubits: usize,
) {
    let num_wires = labels.len();
    for w in 0..num_wires {
        let fill = if w < num_qubits { '─' } else { '═' };
        let _ = write!(out, "{:>label_width$}", labels[w]);
        for col in columns {
            let width = col.width();
            out.push(fill);
            centered(out, &col.cells[w].text().unwrap_or_default(), width, fill);
            out.push(fill);
        }
        out.push('\n');

        if w + 1 < num_wires {
            let mut spacer = " ".repeat(label_width);
            for col in columns {
                let link = col.links[w].map(String::from).unwrap_or_default();
                spacer.push(' ');
                centered(&mut spacer, &link, col.width(), ' ');
                spacer.push(' ');
            }
            out.push_str(spacer.trim_end());
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubit::{ClbitId, QubitId};
    use std::f64::consts::PI;

    fn probe() -> Circuit {
        let mut circuit = Circuit::with_size("probe", 2, 1);
        circuit
            .x(QubitId(0))
            .unwrap()
            .ry(PI / 2.0, QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .barrier_all()
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap();
        circuit
    }

    #[test]
    fn test_labels_and_symbols() {
        let text = draw(&probe(), 0);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("q0: "));
        assert!(lines[2].starts_with("q1: "));
        assert!(lines[4].starts_with("c0: "));

        assert!(lines[0].contains('X'));
        assert!(lines[0].contains('■'));
        assert!(lines[0].contains('M'));
        assert!(lines[2].contains("RY(1.57)"));
        assert!(lines[2].contains('╫'));
        assert!(lines[4].contains('╩'));
        assert!(text.contains('░'));
        assert!(lines[1].contains('│'));
        assert!(lines[3].contains('║'));
    }

    #[test]
    fn test_wire_rows_align() {
        let text = draw(&probe(), 0);
        let widths: Vec<_> = text
            .lines()
            .step_by(2)
            .map(|l| l.chars().count())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_parallel_gates_share_column() {
        let mut circuit = Circuit::with_size("par", 2, 0);
        circuit.x(QubitId(0)).unwrap().x(QubitId(1)).unwrap();
        let text = draw(&circuit, 0);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "q0: ─X─");
        assert_eq!(lines[2], "q1: ─X─");
    }

    #[test]
    fn test_two_qubit_symbols() {
        let mut circuit = Circuit::with_size("two", 2, 0);
        circuit
            .cz(QubitId(1), QubitId(0))
            .unwrap()
            .swap(QubitId(0), QubitId(1))
            .unwrap()
            .iswap(QubitId(0), QubitId(1))
            .unwrap()
            .crx(-0.5, QubitId(0), QubitId(1))
            .unwrap();
        let text = draw(&circuit, 0);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0].matches('■').count(), 2);
        assert!(lines[0].contains('x'));
        assert!(lines[0].contains("iSWAP"));
        assert!(lines[2].contains("iSWAP"));
        assert!(lines[2].contains("RX(-0.50)"));
    }

    #[test]
    fn test_fold_splits_segments() {
        let mut circuit = Circuit::with_size("long", 1, 0);
        for i in 0..9 {
            circuit.rx(f64::from(i) / 10.0, QubitId(0)).unwrap();
        }
        let folded = draw(&circuit, 40);
        assert_eq!(folded.matches("q0: ").count(), 3);
        assert!(folded.lines().all(|l| l.chars().count() <= 40));

        let unfolded = draw(&circuit, 0);
        assert_eq!(unfolded.matches("q0: ").count(), 1);
    }

    #[test]
    fn test_empty_circuit() {
        assert!(draw(&Circuit::new("empty"), 80).is_empty());
        let bare = draw(&Circuit::with_size("bare", 1, 0), 80);
        assert_eq!(bare, "q0: \n");
    }
}

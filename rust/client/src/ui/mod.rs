use crate::*;
use ndarray::Array2;
use std::collections::BTreeMap;

/// Lays a state-value map out as a `size x size` matrix.
pub fn value_matrix(env: &GridWorld, values: &BTreeMap<State, Continous>) -> Result<Array2<Continous>> {
    let mut m = Array2::zeros((env.size(), env.size()));
    for ((row, col), cell) in m.indexed_iter_mut() {
        let s = State::new(row, col);
        *cell = *values.get(&s).ok_or(Error::LookupFailure {
            table: "value",
            state: s,
        })?;
    }

    Ok(m)
}

/// One bracketed line per grid row, values rounded to two decimals.
pub fn render_value_grid(m: &Array2<Continous>) -> String {
    m.rows()
        .into_iter()
        .map(|row| format!("[{}]", row.iter().map(|v| format!("{v:.2}")).join(", ")))
        .join("\n")
}

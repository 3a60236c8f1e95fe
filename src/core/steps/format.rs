// src/core/steps/format.rs
//! Two-decimal rendering of scalars, vectors and matrices for narratives

pub fn number(x: f64) -> String {
    let s = format!("{:.2}", x);
    if s == "-0.00" {
        "0.00".to_string()
    } else {
        s
    }
}

pub fn reals(v: &[f64]) -> String {
    format!("[{}]", v.iter().map(|&x| number(x)).collect::<Vec<_>>().join(", "))
}

pub fn ints(v: &[i64]) -> String {
    format!("[{}]", v.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(", "))
}

pub fn real_rows(rows: &[Vec<f64>]) -> String {
    format!("[{}]", rows.iter().map(|r| reals(r)).collect::<Vec<_>>().join(", "))
}

pub fn int_rows(rows: &[Vec<i64>]) -> String {
    format!("[{}]", rows.iter().map(|r| ints(r)).collect::<Vec<_>>().join(", "))
}

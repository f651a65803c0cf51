pub(crate) fn default_lmstart() -> f64 {
    100.0
}

pub(crate) fn default_lmstep() -> f64 {
    10.0
}

pub(crate) fn default_maxsteps() -> usize {
    20
}

pub(crate) fn default_maxit() -> usize {
    100
}

pub(crate) fn default_tol() -> f64 {
    1e-5
}

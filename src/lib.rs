//! Rust version of the gradient solvers from the geophysical inversion
//! package Fatiando a Terra

/// dynamically-sized column vector of `f64`
pub type Dvec = nalgebra::DVector<f64>;

/// dynamically-sized matrix of `f64`
pub type Dmat = nalgebra::DMatrix<f64>;

pub mod config;

pub mod regularization;

pub mod solver;

pub mod dirichlet;

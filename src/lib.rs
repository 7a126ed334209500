//! Distributed sparse-matrix compute kernels for a multigrid-preconditioned
//! conjugate gradient solver.
//!
//! This crate implements the inner numerical kernels the solver driver calls
//! every iteration, over a distributed row layout where each process owns a
//! contiguous row range and references neighbor-owned columns through halo
//! slots synchronized by a [`Communicator`](comm::Communicator).
//!
//! # Kernels
//!
//! | Kernel | Entry point | Parallelism contract |
//! |--------|-------------|----------------------|
//! | Dot product | [`dot_product`](dot::dot_product) | local order free, one global reduction |
//! | SpMV | [`spmv`](spmv::spmv) | rows independent |
//! | Symmetric Gauss-Seidel | [`symgs`](symgs::symgs) | rows strictly sequential per sweep |
//! | Restriction | [`restrict`](restriction::restrict) | coarse rows independent |
//! | Prolongation | [`prolong`](prolongation::prolong) | independent stores (injective f2c) |
//!
//! Matrix construction and the message-passing backend are external
//! collaborators: the matrix arrives fully populated (validate it once with
//! [`validation::validate_matrix`] and [`validation::validate_mg_linkage`])
//! and communication is whatever implements [`comm::Communicator`].
//!
//! # Example
//!
//! ```rust
//! use sparsemg::comm::SingleProcess;
//! use sparsemg::types::{SparseMatrix, Vector};
//!
//! // y = A * x with A the 3x3 identity.
//! let a = SparseMatrix::identity(3);
//! let mut x = Vector::from_values(vec![1.0, 2.0, 3.0]);
//! let mut y = Vector::zeros(3);
//! sparsemg::spmv::spmv(&a, &mut x, &mut y, &SingleProcess).unwrap();
//! assert_eq!(y.values, vec![1.0, 2.0, 3.0]);
//!
//! let mut time_allreduce = 0.0;
//! let norm_sq =
//!     sparsemg::dot::dot_product(3, &y, &y, &SingleProcess, &mut time_allreduce).unwrap();
//! assert_eq!(norm_sq, 14.0);
//! ```

pub mod comm;
pub mod dot;
pub mod error;
pub mod prolongation;
pub mod restriction;
pub mod simd;
pub mod spmv;
pub mod symgs;
pub mod types;
pub mod validation;

pub use comm::{Communicator, SingleProcess};
pub use dot::dot_product;
pub use error::{CommError, KernelError, ValidationError};
pub use prolongation::prolong;
pub use restriction::restrict;
pub use spmv::spmv;
pub use symgs::symgs;
pub use types::{MgLinkage, SparseMatrix, Vector};

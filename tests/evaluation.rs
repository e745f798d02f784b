//! End-to-end checks: build a graph through the public API, evaluate it
//! numerically, and compare against values computed directly

mod common;

use common::{env, evaluate, substitute};
use std::collections::HashMap;
use symr::{Expr, Matrix, Sparsity, inner_prod, outer_prod, prod, unite};

#[test]
fn elementwise_arithmetic() {
    let x = Expr::sym("x", 2, 2);
    let y = Expr::sym("y", 2, 2);
    let f = (&x * &y + 2.0) / &y - &x;

    let xv = [1.0, 2.0, 3.0, 4.0];
    let yv = [5.0, 6.0, 7.0, 8.0];
    let e = env(&[
        ("x", Matrix::from_dense(2, 2, &xv).unwrap()),
        ("y", Matrix::from_dense(2, 2, &yv).unwrap()),
    ]);
    let out = evaluate(&f, &e).unwrap();
    let expected: Vec<f64> = xv
        .iter()
        .zip(&yv)
        .map(|(&a, &b)| (a * b + 2.0) / b - a)
        .collect();
    assert_eq!(out.to_dense(), expected);
}

#[test]
fn transcendental_chain() {
    let x = Expr::sym("x", 1, 3);
    let f = (x.sin() + x.cos()) * x.exp();

    let xv = [0.5, 1.0, -0.25];
    let e = env(&[("x", Matrix::from_dense(1, 3, &xv).unwrap())]);
    let out = evaluate(&f, &e).unwrap();
    for (got, &v) in out.to_dense().iter().zip(&xv) {
        assert!((got - (v.sin() + v.cos()) * v.exp()).abs() < 1e-12);
    }
}

#[test]
fn matrix_product() {
    let a = Expr::sym("a", 2, 3);
    let b = Expr::sym("b", 3, 2);
    let f = prod(&a, &b).unwrap();

    let e = env(&[
        (
            "a",
            Matrix::from_dense(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap(),
        ),
        (
            "b",
            Matrix::from_dense(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap(),
        ),
    ]);
    let out = evaluate(&f, &e).unwrap();
    assert_eq!(out.to_dense(), vec![22.0, 28.0, 49.0, 64.0]);
}

#[test]
fn sparse_product_skips_structural_zeros() {
    // a is diagonal, so the product pattern stays diagonal
    let a = Expr::sym_with("a", Sparsity::diagonal(2));
    let b = Expr::sym_with("b", Sparsity::diagonal(2));
    let f = prod(&a, &b).unwrap();
    assert!(f.sparsity().is_diagonal());

    let e = env(&[
        ("a", Matrix::new(Sparsity::diagonal(2), vec![2.0, 3.0]).unwrap()),
        ("b", Matrix::new(Sparsity::diagonal(2), vec![5.0, 7.0]).unwrap()),
    ]);
    let out = evaluate(&f, &e).unwrap();
    assert_eq!(out.to_dense(), vec![10.0, 0.0, 0.0, 21.0]);
}

#[test]
fn inner_and_outer_products() {
    let x = Expr::sym("x", 3, 1);
    let y = Expr::sym("y", 3, 1);
    let dot = inner_prod(&x, &y).unwrap();
    let outer = outer_prod(&x, &y).unwrap();

    let e = env(&[
        ("x", Matrix::from_dense(3, 1, &[1.0, 2.0, 3.0]).unwrap()),
        ("y", Matrix::from_dense(3, 1, &[4.0, 5.0, 6.0]).unwrap()),
    ]);
    assert_eq!(evaluate(&dot, &e).unwrap().to_dense(), vec![32.0]);
    assert_eq!(
        evaluate(&outer, &e).unwrap().to_dense(),
        vec![4.0, 5.0, 6.0, 8.0, 10.0, 12.0, 12.0, 15.0, 18.0]
    );
}

#[test]
fn transpose_and_diag() {
    let sp = Sparsity::from_compressed(2, 2, vec![0, 2, 3], vec![0, 1, 1]).unwrap();
    let x = Expr::sym_with("x", sp.clone());
    let t = x.transpose();
    let d = x.diag().unwrap();

    let e = env(&[("x", Matrix::new(sp, vec![1.0, 2.0, 3.0]).unwrap())]);
    // x = [1 2; 0 3]
    assert_eq!(
        evaluate(&t, &e).unwrap().to_dense(),
        vec![1.0, 0.0, 2.0, 3.0]
    );
    assert_eq!(evaluate(&d, &e).unwrap().to_dense(), vec![1.0, 3.0]);
}

#[test]
fn unary_densification_fills_function_of_zero() {
    let x = Expr::sym_with("x", Sparsity::diagonal(2));
    let f = x.exp();
    assert!(f.is_dense());

    let e = env(&[("x", Matrix::new(Sparsity::diagonal(2), vec![0.0, 1.0]).unwrap())]);
    let out = evaluate(&f, &e).unwrap();
    assert_eq!(out.get(0, 1), 1.0); // exp(0) at a structurally absent position
    assert!((out.get(1, 1) - 1.0f64.exp()).abs() < 1e-15);
}

#[test]
fn erf_preserves_sparsity_and_evaluates() {
    let x = Expr::sym_with("x", Sparsity::diagonal(2));
    let f = x.erf();
    assert!(f.sparsity().is_diagonal());

    let e = env(&[("x", Matrix::new(Sparsity::diagonal(2), vec![1.0, -1.0]).unwrap())]);
    let out = evaluate(&f, &e).unwrap();
    assert!((out.get(0, 0) - 0.842_700_79).abs() < 1e-6);
    assert!((out.get(1, 1) + 0.842_700_79).abs() < 1e-6);
    assert_eq!(out.get(0, 1), 0.0);
}

#[test]
fn min_max_broadcast() {
    let x = Expr::sym("x", 1, 3);
    let clamped = x.fmax(&Expr::from(0.0)).unwrap().fmin(&Expr::from(1.0)).unwrap();

    let e = env(&[("x", Matrix::from_dense(1, 3, &[-0.5, 0.25, 2.0]).unwrap())]);
    assert_eq!(
        evaluate(&clamped, &e).unwrap().to_dense(),
        vec![0.0, 0.25, 1.0]
    );
}

#[test]
fn unite_prefers_second_operand_on_overlap() {
    let x = Expr::sym("x", 2, 2);
    let y = Expr::sym("y", 2, 2);
    let u = unite(&x, &y).unwrap();

    let e = env(&[
        ("x", Matrix::from_dense(2, 2, &[1.0, 1.0, 1.0, 1.0]).unwrap()),
        ("y", Matrix::from_dense(2, 2, &[9.0, 9.0, 9.0, 9.0]).unwrap()),
    ]);
    assert_eq!(evaluate(&u, &e).unwrap().to_dense(), vec![9.0; 4]);
}

#[test]
fn substitution_resimplifies_the_graph() {
    let x = Expr::sym("x", 2, 2);
    let y = Expr::sym("y", 2, 2);
    let f = &x * &y + x.sin();

    let mut subs = HashMap::new();
    subs.insert("y".to_string(), Expr::zeros(2, 2));
    let g = substitute(&f, &subs).unwrap();
    // x * 0 collapsed structurally, leaving only sin(x)
    assert!(g.is_unary_op(symr::UnaryOp::Sin));
}

#[test]
fn substitution_matches_numeric_evaluation() {
    let x = Expr::sym("x", 2, 1);
    let f = x.tanh() + x.powf(2.0).unwrap();

    let xv = Matrix::from_dense(2, 1, &[0.3, -1.2]).unwrap();
    let direct = evaluate(&f, &env(&[("x", xv.clone())])).unwrap();

    let mut subs = HashMap::new();
    subs.insert("x".to_string(), Expr::constant(xv));
    let g = substitute(&f, &subs).unwrap();
    // the substituted graph is symbol-free and evaluates with an empty env
    let via_graph = evaluate(&g, &HashMap::new()).unwrap();
    assert_eq!(direct.to_dense(), via_graph.to_dense());
}

#[test]
fn shared_subgraph_evaluates_consistently() {
    let x = Expr::sym("x", 2, 2);
    let s = x.sin();
    let f = &s + &s;

    let e = env(&[("x", Matrix::from_dense(2, 2, &[0.1, 0.2, 0.3, 0.4]).unwrap())]);
    let out = evaluate(&f, &e).unwrap();
    for (got, v) in out.to_dense().iter().zip([0.1f64, 0.2, 0.3, 0.4]) {
        assert!((got - 2.0 * v.sin()).abs() < 1e-15);
    }
}

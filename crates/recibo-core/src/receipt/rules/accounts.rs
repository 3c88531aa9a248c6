//! Masked phone account rules.
//!
//! Both roles share the same value shape, so the generic rules rely on
//! context: origin rules refuse anything labelled as the beneficiary's, and
//! the destination's catch-all only runs once the origin has claimed its
//! number.

use lazy_static::lazy_static;

use super::{Boundary, ContextGuard, Normalize, Rule};

const BENEFICIARY_LABEL: &str = "beneficiario|destinatario";

lazy_static! {
    pub static ref ORIGIN_RULES: Vec<Rule> = vec![
        Rule::new(
            "origin_phone_label",
            r"(?:Tu\s+n[uú]mero\s+de\s+celular|celular)[^<]*?X+(\d{3,4})",
            Normalize::MaskedAccount,
            0.99,
        )
        .with_guard(ContextGuard::new(BENEFICIARY_LABEL, 0)),
        Rule::new("origin_any_mask", r"X{5,}(\d{3,4})", Normalize::MaskedAccount, 0.88)
            .with_boundary(Boundary::MaskTerminated)
            .with_guard(ContextGuard::new(BENEFICIARY_LABEL, 32)),
    ];

    pub static ref DESTINATION_RULES: Vec<Rule> = vec![
        Rule::new(
            "destination_phone_label",
            r"(?:Celular\s+del\s+)?Beneficiario[^<]*?X+(\d{3,4})",
            Normalize::MaskedAccount,
            0.99,
        ),
        Rule::new("destination_any_mask", r"X{5,}(\d{3,4})", Normalize::MaskedAccount, 0.75)
            .with_boundary(Boundary::MaskTerminated),
    ];
}

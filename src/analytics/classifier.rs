// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Maps free-form category labels onto the budgeting buckets used by the
//! dashboards. The table is built once; unknown labels resolve to
//! [`CategoryBucket::DEFAULT`] without error.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryBucket {
    Essential,
    NonEssential,
    Reserve,
}

impl CategoryBucket {
    pub const DEFAULT: CategoryBucket = CategoryBucket::NonEssential;

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryBucket::Essential => "essential",
            CategoryBucket::NonEssential => "non_essential",
            CategoryBucket::Reserve => "reserve",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum KnownCategory {
    Moradia,
    Alimentacao,
    Mercado,
    Saude,
    Transporte,
    Educacao,
    Contas,
    Impostos,
    Lazer,
    Restaurante,
    Compras,
    Vestuario,
    Assinaturas,
    Viagem,
    Outros,
    Reserva,
    Investimento,
    Poupanca,
    Previdencia,
    Salario,
    Vendas,
    Servicos,
    Freelance,
    Rendimentos,
}

impl KnownCategory {
    const ALL: [KnownCategory; 24] = [
        KnownCategory::Moradia,
        KnownCategory::Alimentacao,
        KnownCategory::Mercado,
        KnownCategory::Saude,
        KnownCategory::Transporte,
        KnownCategory::Educacao,
        KnownCategory::Contas,
        KnownCategory::Impostos,
        KnownCategory::Lazer,
        KnownCategory::Restaurante,
        KnownCategory::Compras,
        KnownCategory::Vestuario,
        KnownCategory::Assinaturas,
        KnownCategory::Viagem,
        KnownCategory::Outros,
        KnownCategory::Reserva,
        KnownCategory::Investimento,
        KnownCategory::Poupanca,
        KnownCategory::Previdencia,
        KnownCategory::Salario,
        KnownCategory::Vendas,
        KnownCategory::Servicos,
        KnownCategory::Freelance,
        KnownCategory::Rendimentos,
    ];

    fn bucket(self) -> CategoryBucket {
        use KnownCategory::*;
        match self {
            Moradia | Alimentacao | Mercado | Saude | Transporte | Educacao | Contas
            | Impostos => CategoryBucket::Essential,
            Reserva | Investimento | Poupanca | Previdencia => CategoryBucket::Reserve,
            // Income labels only reach the classifier when recorded as expenses.
            Lazer | Restaurante | Compras | Vestuario | Assinaturas | Viagem | Outros
            | Salario | Vendas | Servicos | Freelance | Rendimentos => CategoryBucket::NonEssential,
        }
    }

    fn display_name(self) -> &'static str {
        use KnownCategory::*;
        match self {
            Moradia => "Moradia",
            Alimentacao => "Alimentação",
            Mercado => "Mercado",
            Saude => "Saúde",
            Transporte => "Transporte",
            Educacao => "Educação",
            Contas => "Contas da Casa",
            Impostos => "Impostos",
            Lazer => "Lazer",
            Restaurante => "Restaurantes",
            Compras => "Compras",
            Vestuario => "Vestuário",
            Assinaturas => "Assinaturas",
            Viagem => "Viagens",
            Outros => "Outros",
            Reserva => "Reserva de Emergência",
            Investimento => "Investimentos",
            Poupanca => "Poupança",
            Previdencia => "Previdência",
            Salario => "Salário",
            Vendas => "Vendas",
            Servicos => "Serviços",
            Freelance => "Freelance",
            Rendimentos => "Rendimentos",
        }
    }

    fn keys(self) -> &'static [&'static str] {
        use KnownCategory::*;
        match self {
            Moradia => &["moradia", "aluguel", "condominio", "condomínio"],
            Alimentacao => &["alimentacao", "alimentação"],
            Mercado => &["mercado", "supermercado"],
            Saude => &["saude", "saúde", "farmacia", "farmácia"],
            Transporte => &["transporte", "combustivel", "combustível"],
            Educacao => &["educacao", "educação"],
            Contas => &["contas", "energia", "agua", "água", "internet"],
            Impostos => &["impostos", "das", "taxas"],
            Lazer => &["lazer"],
            Restaurante => &["restaurante", "restaurantes", "delivery"],
            Compras => &["compras"],
            Vestuario => &["vestuario", "vestuário", "roupas"],
            Assinaturas => &["assinaturas", "streaming"],
            Viagem => &["viagem", "viagens"],
            Outros => &["outros"],
            Reserva => &["reserva", "reserva de emergencia", "reserva de emergência"],
            Investimento => &["investimento", "investimentos"],
            Poupanca => &["poupanca", "poupança"],
            Previdencia => &["previdencia", "previdência"],
            Salario => &["salario", "salário"],
            Vendas => &["vendas"],
            Servicos => &["servicos", "serviços"],
            Freelance => &["freelance"],
            Rendimentos => &["rendimentos"],
        }
    }
}

static LOOKUP: Lazy<HashMap<&'static str, KnownCategory>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for known in KnownCategory::ALL {
        for key in known.keys() {
            map.insert(*key, known);
        }
    }
    map
});

fn normalize(category: &str) -> String {
    category.trim().to_lowercase()
}

fn lookup(category: &str) -> Option<KnownCategory> {
    LOOKUP.get(normalize(category).as_str()).copied()
}

pub fn classify(category: &str) -> CategoryBucket {
    match lookup(category) {
        Some(known) => known.bucket(),
        None => {
            tracing::debug!(category, "unknown category, using default bucket");
            CategoryBucket::DEFAULT
        }
    }
}

/// Human-readable label; unmapped categories are returned as given.
pub fn category_display_name(category: &str) -> String {
    match lookup(category) {
        Some(known) => known.display_name().to_string(),
        None => category.to_string(),
    }
}

pub fn is_known_category(category: &str) -> bool {
    lookup(category).is_some()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnownCategoryRow {
    pub key: &'static str,
    pub display_name: &'static str,
    pub bucket: CategoryBucket,
}

/// One row per canonical category, using its first key.
pub fn known_categories() -> Vec<KnownCategoryRow> {
    KnownCategory::ALL
        .iter()
        .map(|k| KnownCategoryRow {
            key: k.keys()[0],
            display_name: k.display_name(),
            bucket: k.bucket(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_map_to_buckets() {
        assert_eq!(classify("moradia"), CategoryBucket::Essential);
        assert_eq!(classify("saúde"), CategoryBucket::Essential);
        assert_eq!(classify("saude"), CategoryBucket::Essential);
        assert_eq!(classify("lazer"), CategoryBucket::NonEssential);
        assert_eq!(classify("reserva"), CategoryBucket::Reserve);
        assert_eq!(classify("investimento"), CategoryBucket::Reserve);
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        assert_eq!(classify("  Moradia "), CategoryBucket::Essential);
        assert_eq!(classify("INVESTIMENTOS"), CategoryBucket::Reserve);
    }

    #[test]
    fn unknown_labels_fall_back_silently() {
        assert_eq!(classify("pet shop"), CategoryBucket::NonEssential);
        assert_eq!(classify(""), CategoryBucket::DEFAULT);
        assert!(!is_known_category("pet shop"));
    }

    #[test]
    fn display_name_falls_back_to_raw_label() {
        assert_eq!(category_display_name("saude"), "Saúde");
        assert_eq!(category_display_name("Pet Shop"), "Pet Shop");
    }

    #[test]
    fn every_key_resolves_to_its_own_category() {
        for known in KnownCategory::ALL {
            for key in known.keys() {
                assert_eq!(lookup(key), Some(known), "key {key}");
            }
        }
        assert_eq!(known_categories().len(), KnownCategory::ALL.len());
    }
}

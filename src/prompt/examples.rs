/// A worked question/query pair shown to the model before the real question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Example {
    pub question: &'static str,
    pub query: &'static str,
}

// Order and variety matter: single level, paginated, two hops through fragment
// reuse, then pagination combined with traversal.
pub(crate) const WORKED_EXAMPLES: &[Example] = &[
    Example {
        question: "What are the targets of vorinostat",
        query: r#"
# single level query
query search_for_drug_and_extract_target {
  search(queryString: "vorinostat", entityNames: "drug") {
    hits {
      object {
        ...extract_target_info
      }
    }
  }
}

fragment extract_target_info on Drug {
  linkedTargets {
    rows {
      _extracted:approvedSymbol
    }
  }
}"#,
    },
    Example {
        question: "What are the top 3 diseases associated with ABCA4?",
        query: r#"
# single level query
query search_for_target_and_extract_disease {
  search(queryString: "ABCA4", entityNames: "target") {
    hits {
      object {
        ...extract_disease_info
      }
    }
  }
}

fragment extract_disease_info on Target {
  associatedDiseases(page: {index: 0, size: 3}) {
    rows {
      disease { _extracted:name }
    }
  }
}
"#,
    },
    Example {
        question: "What are the diseases associated with ABCA4?",
        query: r#"
# single level query
query search_for_target_and_extract_disease {
  search(queryString: "ABCA4", entityNames: "target") {
    hits {
      object {
        ...extract_disease_info
      }
    }
  }
}

fragment extract_disease_info on Target {
  associatedDiseases {
    rows {
      disease { _extracted:name }
    }
  }
}
"#,
    },
    Example {
        question: "Find drugs that are used for treating ulcerative colitis.",
        query: r#"
# single level query
query search_for_disease_and_extract_known_drugs {
  search(queryString: "ulcerative colitis", entityNames: "disease") {
    hits {
      object {
        ...extract_drug_info
      }
    }
  }
}

fragment extract_drug_info on Disease {
  knownDrugs {
    rows {
      drug { _extracted:name }
    }
  }
}
"#,
    },
    Example {
        question: "what are the genes associated with Alzheimer's",
        query: r#"
# single level query
query search_for_disease_and_extract_genes {
  search(queryString: "Alzheimer's", entityNames: "disease") {
    hits {
      object {
        ...extract_gene_info
      }
    }
  }
}

fragment extract_gene_info on Disease {
  associatedTargets {
    rows {
      target { _extracted:approvedSymbol }
    }
  }
}
"#,
    },
    Example {
        question: "what are the pathways associated with Alzheimer's",
        query: r#"
# single level query
query search_for_disease_and_extract_pathway {
  search(queryString: "Alzheimer's", entityNames: "disease") {
    hits {
      object {
        ...extract_pathway_info
      }
    }
  }
}

fragment extract_pathway_info on Disease {
  associatedTargets {
    rows {
      target { _extracted:approvedSymbol }
    }
  }
}
"#,
    },
    Example {
        question: "what are the side effects of thalidomide?",
        query: r#"
# single level query
query search_for_drug_and_extract_side_effects{
  search(queryString: "thalidomide", entityNames: "drug") {
    hits {
      object {
        ...extract_adverse_events_info
      }
    }
  }
}

fragment extract_adverse_events_info on Drug {
  drugWarnings{
    _extracted:toxicityClass
  }
  adverseEvents {
    rows {
      _extracted:name
    }
  }
}
"#,
    },
    Example {
        question: "Where is GFAP expressed?",
        query: r#"
# single level query
query search_for_gene_and_extract_expression {
  search(queryString: "GFAP", entityNames: "target") {
    hits {
      object {
        ...extract_expression_info
      }
    }
  }
}

fragment extract_expression_info on Target {
  expressions {
    tissue {_extracted:label}
    }
  }
"#,
    },
    Example {
        question: "Which diseases are associated with the genes targetted by fasudil?",
        query: r#"
query search_for_drug_and_extract_target {
  search(queryString: "fasudil", entityNames: "drug") {
    hits {
      object {
        ...extract_linked_targets
      }
    }
  }
}

fragment extract_linked_targets on Drug {
  linkedTargets {
    rows {
      ...extract_disease_info
    }
  }
}

fragment extract_disease_info on Target {
  associatedDiseases {
    rows {
      disease { _extracted:name }
    }
  }
}
"#,
    },
    Example {
        question: "Show all the diseases that have at least 5 pathways associated with Alzheimer",
        query: r#"
query search_for_disease_and_extract_targets {
  search(queryString: "Alzheimer", entityNames: "disease") {
    hits {
      object {
        ...extract_associated_targets
      }
    }
  }
}

fragment extract_associated_targets on Disease {
  associatedTargets(page: { index: 0, size: 5 }) {
    rows {
      target {
        ...extract_disease_info
      }
    }
  }
}

fragment extract_disease_info on Target {
  associatedDiseases {
    rows {
      disease {
        _extracted: name
      }
    }
  }
}
"#,
    },
    Example {
        question: "What are the drugs that interact with the top 3 genes associated with Cystic Fibrosis",
        query: r#"
query search_for_disease_and_extract_target {
  search(queryString: "Cystic Fibrosis", entityNames: "disease") {
    hits {
      object {
        ...extract_associated_genes
      }
    }
  }
}

fragment extract_associated_genes on Disease {
  associatedTargets(page: {index: 0, size: 3}) {
    rows {
      target {
        ...extract_known_drugs
      }
    }
  }
}

fragment extract_known_drugs on Target {
  knownDrugs {
    rows {
      drug {
        _extracted: name
      }
    }
  }
}
"#,
    },
];

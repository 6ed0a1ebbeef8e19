//! Letter rendering.
//!
//! [`render_letter`] turns a [`DraftLetter`] into an ordered list of sections made of simple
//! blocks. It is a pure function of the draft's values: the same draft always renders to the
//! same letter, whatever order its fields were filled in. Text forms are derived from the
//! structured letter by [`RenderedLetter::to_plain_text`] and [`RenderedLetter::to_markdown`];
//! the PDF export walks the same blocks.
//!
//! Missing values render as empty text. Dates are printed in long form (`March 5, 2024`) and an
//! empty or unreadable date prints as nothing.

use crate::constants::{CLOSING_MESSAGE, LETTER_TITLE, SALUTATION_FALLBACK, SIGN_OFF};
use crate::draft::DraftLetter;
use lmn_types::format_long_date;
use serde::Serialize;

/// Letter sections, in the order they are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    InsuranceAddress,
    Reference,
    Salutation,
    Introduction,
    Diagnosis,
    TreatmentHistory,
    MedicalNecessity,
    Closing,
}

impl SectionKind {
    pub const ALL: [SectionKind; 8] = [
        SectionKind::InsuranceAddress,
        SectionKind::Reference,
        SectionKind::Salutation,
        SectionKind::Introduction,
        SectionKind::Diagnosis,
        SectionKind::TreatmentHistory,
        SectionKind::MedicalNecessity,
        SectionKind::Closing,
    ];
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "text")]
pub enum Block {
    Heading(String),
    /// Emphasised single line.
    Strong(String),
    Line(String),
    /// Free text; embedded line breaks are kept.
    Paragraph(String),
    Bullet(String),
}

impl Block {
    pub fn text(&self) -> &str {
        match self {
            Block::Heading(text)
            | Block::Strong(text)
            | Block::Line(text)
            | Block::Paragraph(text)
            | Block::Bullet(text) => text,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterSection {
    pub kind: SectionKind,
    pub blocks: Vec<Block>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedLetter {
    pub title: String,
    /// Letter date in long form; empty when unset.
    pub date: String,
    pub sections: Vec<LetterSection>,
}

impl RenderedLetter {
    pub fn section(&self, kind: SectionKind) -> Option<&LetterSection> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        if !self.date.is_empty() {
            out.push_str(&self.date);
            out.push('\n');
        }
        for section in self.sections.iter().filter(|s| !s.blocks.is_empty()) {
            out.push('\n');
            for block in &section.blocks {
                match block {
                    Block::Bullet(text) => {
                        out.push_str("  - ");
                        out.push_str(text);
                    }
                    other => out.push_str(other.text()),
                }
                out.push('\n');
            }
        }
        out
    }

    pub fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n", escape_markdown(&self.title));
        if !self.date.is_empty() {
            out.push('\n');
            out.push_str(&escape_markdown(&self.date));
            out.push('\n');
        }
        for section in self.sections.iter().filter(|s| !s.blocks.is_empty()) {
            out.push('\n');
            let mut in_list = false;
            for block in &section.blocks {
                if in_list && !matches!(block, Block::Bullet(_)) {
                    out.push('\n');
                }
                in_list = matches!(block, Block::Bullet(_));
                match block {
                    Block::Heading(text) => {
                        out.push_str(&format!("## {}\n\n", escape_markdown(text)))
                    }
                    Block::Strong(text) => {
                        out.push_str(&format!("**{}**  \n", escape_markdown(text)))
                    }
                    Block::Line(text) => out.push_str(&format!("{}  \n", escape_markdown(text))),
                    Block::Paragraph(text) => {
                        let body = escape_markdown(text).replace('\n', "  \n");
                        out.push_str(&format!("\n{body}\n\n"));
                    }
                    Block::Bullet(text) => out.push_str(&format!("- {}\n", escape_markdown(text))),
                }
            }
        }
        out
    }
}

/// Joins name parts with single spaces, skipping blank parts.
pub(crate) fn join_words(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escapes line-start `#`, horizontal rules and code fences so free text cannot restructure
/// the document.
fn escape_markdown(text: &str) -> String {
    text.lines()
        .map(|line| {
            let trimmed = line.trim();
            if line.trim_start().starts_with('#') {
                line.replacen('#', r"\#", 1)
            } else if trimmed == "---" || trimmed == "***" || trimmed == "___" {
                format!(r"\{trimmed}")
            } else {
                line.replace("```", r"\`\`\`")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_nonblank(blocks: &mut Vec<Block>, block: Block) {
    if !block.text().trim().is_empty() {
        blocks.push(block);
    }
}

pub fn render_letter(draft: &DraftLetter) -> RenderedLetter {
    let provider = draft.provider.clone().unwrap_or_default();
    let practice = draft.practice.clone().unwrap_or_default();
    let patient = draft.patient.clone().unwrap_or_default();
    let insurance = draft.insurance.clone().unwrap_or_default();
    let diagnosis = draft.diagnosis.clone().unwrap_or_default();
    let history = draft.treatment_history.clone().unwrap_or_default();
    let company = &insurance.company;

    let mut address = Vec::new();
    push_nonblank(&mut address, Block::Strong(company.name.clone()));
    push_nonblank(&mut address, Block::Line(company.contact_name.clone()));
    push_nonblank(&mut address, Block::Line(company.address1.clone()));
    push_nonblank(&mut address, Block::Line(company.address2.clone()));
    let region = join_words(&[&company.state, &company.zip]);
    let locality = match (company.city.trim().is_empty(), region.is_empty()) {
        (false, false) => format!("{}, {region}", company.city.trim()),
        (false, true) => company.city.trim().to_string(),
        _ => region,
    };
    push_nonblank(&mut address, Block::Line(locality));

    let mut reference = vec![
        Block::Strong(format!(
            "Re: {}",
            join_words(&[&patient.first_name, &patient.last_name])
        )),
        Block::Line(format!("Policy Number: {}", insurance.policy_number)),
    ];
    if !insurance.group_number.trim().is_empty() {
        reference.push(Block::Line(format!(
            "Group Number: {}",
            insurance.group_number
        )));
    }

    let addressee = if company.contact_name.trim().is_empty() {
        SALUTATION_FALLBACK
    } else {
        company.contact_name.trim()
    };
    let salutation = vec![Block::Line(format!("Dear {addressee},"))];

    let mut introduction = Vec::new();
    push_nonblank(
        &mut introduction,
        Block::Paragraph(draft.introduction.clone().unwrap_or_default()),
    );

    let mut diagnosis_blocks = vec![
        Block::Heading("Diagnosis".into()),
        Block::Paragraph(format!(
            "{} has been diagnosed with {} (ICD-10: {}).",
            patient.first_name.trim(),
            diagnosis.description.trim(),
            diagnosis.icd10_code.trim()
        )),
    ];
    if !diagnosis.lab_results.is_empty() {
        diagnosis_blocks.push(Block::Strong("Relevant Laboratory Results:".into()));
        diagnosis_blocks.extend(diagnosis.lab_results.iter().map(|lab| {
            Block::Bullet(format!(
                "{}: {} {} ({})",
                lab.test,
                lab.result,
                lab.unit,
                format_long_date(&lab.date)
            ))
        }));
    }

    let mut history_blocks = vec![Block::Heading("Treatment History".into())];
    push_nonblank(
        &mut history_blocks,
        Block::Paragraph(history.condition_description.clone()),
    );
    if !history.treatments.is_empty() {
        history_blocks.push(Block::Strong("Previous Treatments and Outcomes:".into()));
        history_blocks.extend(history.treatments.iter().map(|treatment| {
            Block::Bullet(format!(
                "{} ({}): {}",
                treatment.treatment,
                format_long_date(&treatment.date),
                treatment.outcome
            ))
        }));
    }
    push_nonblank(&mut history_blocks, Block::Paragraph(history.rationale.clone()));

    let mut necessity = vec![Block::Heading("Medical Necessity".into())];
    push_nonblank(
        &mut necessity,
        Block::Paragraph(draft.final_rationale.clone().unwrap_or_default()),
    );

    let mut closing = vec![
        Block::Paragraph(CLOSING_MESSAGE.into()),
        Block::Line(SIGN_OFF.into()),
    ];
    push_nonblank(
        &mut closing,
        Block::Strong(join_words(&[
            &provider.title,
            &provider.first_name,
            &provider.last_name,
        ])),
    );
    closing.push(Block::Line(format!("NPI: {}", provider.npi_number)));
    push_nonblank(&mut closing, Block::Line(practice.name.clone()));
    push_nonblank(&mut closing, Block::Line(practice.phone.clone()));

    let sections = SectionKind::ALL
        .into_iter()
        .zip([
            address,
            reference,
            salutation,
            introduction,
            diagnosis_blocks,
            history_blocks,
            necessity,
            closing,
        ])
        .map(|(kind, blocks)| LetterSection { kind, blocks })
        .collect();

    RenderedLetter {
        title: LETTER_TITLE.into(),
        date: format_long_date(draft.letter_date.as_deref().unwrap_or_default()),
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::Template;
    use crate::draft::{
        Diagnosis, Insurance, InsuranceCompany, LabResult, Patient, Practice, ProviderDetails,
        Treatment, TreatmentHistory,
    };
    use crate::steps::{FinalReview, TemplateSelection};
    use crate::store::DraftStore;
    use lmn_types::EntryId;

    fn full_draft() -> DraftLetter {
        DraftLetter {
            template_id: Some("1".into()),
            letter_date: Some("2024-03-05".into()),
            provider: Some(ProviderDetails {
                title: "MD".into(),
                first_name: "John".into(),
                last_name: "Doe".into(),
                npi_number: "1234567890".into(),
            }),
            practice: Some(Practice {
                name: "Medical Center".into(),
                phone: "(555) 123-4567".into(),
                ..Default::default()
            }),
            patient: Some(Patient {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                date_of_birth: "1990-01-02".into(),
            }),
            insurance: Some(Insurance {
                policy_number: "P-100".into(),
                company: InsuranceCompany {
                    name: "Acme Health".into(),
                    address1: "1 Main St".into(),
                    city: "Springfield".into(),
                    state: "IL".into(),
                    zip: "62701".into(),
                    ..Default::default()
                },
                ..Default::default()
            }),
            diagnosis: Some(Diagnosis {
                icd10_code: "J45.50".into(),
                description: "severe persistent asthma".into(),
                lab_results: vec![LabResult {
                    id: EntryId::from("l1"),
                    date: "2024-01-15".into(),
                    test: "Eosinophils".into(),
                    result: "450".into(),
                    unit: "cells/uL".into(),
                }]
                .into(),
                additional_details: String::new(),
            }),
            treatment_history: Some(TreatmentHistory {
                condition_description: "Symptoms persist despite therapy.".into(),
                treatments: vec![Treatment {
                    id: EntryId::from("t1"),
                    date: "2023-06-01".into(),
                    treatment: "High-dose ICS".into(),
                    outcome: "Inadequate control".into(),
                }]
                .into(),
                rationale: "Biologic therapy is indicated.".into(),
            }),
            introduction: Some("I am writing on behalf of my patient.".into()),
            final_rationale: Some("Line one\nLine two".into()),
            ..Default::default()
        }
    }

    fn blocks(letter: &RenderedLetter, kind: SectionKind) -> Vec<Block> {
        letter.section(kind).map(|s| s.blocks.clone()).unwrap_or_default()
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let letter = render_letter(&full_draft());
        let kinds: Vec<SectionKind> = letter.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, SectionKind::ALL.to_vec());
        assert_eq!(letter.title, "Letter of Medical Necessity");
        assert_eq!(letter.date, "March 5, 2024");
    }

    #[test]
    fn test_render_is_deterministic() {
        let draft = full_draft();
        assert_eq!(render_letter(&draft), render_letter(&draft));

        let mut rebuilt = DraftLetter::default();
        rebuilt.final_rationale = draft.final_rationale.clone();
        rebuilt.diagnosis = draft.diagnosis.clone();
        rebuilt.patient = draft.patient.clone();
        rebuilt.merge(draft.clone());
        assert_eq!(render_letter(&rebuilt), render_letter(&draft));
        assert_eq!(
            render_letter(&rebuilt).to_markdown(),
            render_letter(&draft).to_markdown()
        );
    }

    #[test]
    fn test_reference_and_salutation() {
        let letter = render_letter(&full_draft());
        assert_eq!(
            blocks(&letter, SectionKind::Reference),
            vec![
                Block::Strong("Re: Ada Lovelace".into()),
                Block::Line("Policy Number: P-100".into()),
            ]
        );
        assert_eq!(
            blocks(&letter, SectionKind::Salutation),
            vec![Block::Line("Dear Sir/Madam,".into())]
        );

        let mut draft = full_draft();
        let insurance = draft.insurance_mut();
        insurance.group_number = "G-7".into();
        insurance.company.contact_name = "Dr. Claims".into();
        let letter = render_letter(&draft);
        assert!(blocks(&letter, SectionKind::Reference)
            .contains(&Block::Line("Group Number: G-7".into())));
        assert_eq!(
            blocks(&letter, SectionKind::Salutation),
            vec![Block::Line("Dear Dr. Claims,".into())]
        );
    }

    #[test]
    fn test_address_block() {
        let letter = render_letter(&full_draft());
        assert_eq!(
            blocks(&letter, SectionKind::InsuranceAddress),
            vec![
                Block::Strong("Acme Health".into()),
                Block::Line("1 Main St".into()),
                Block::Line("Springfield, IL 62701".into()),
            ]
        );
    }

    #[test]
    fn test_lab_and_treatment_bullets() {
        let letter = render_letter(&full_draft());
        let diagnosis = blocks(&letter, SectionKind::Diagnosis);
        assert!(diagnosis.contains(&Block::Paragraph(
            "Ada has been diagnosed with severe persistent asthma (ICD-10: J45.50).".into()
        )));
        assert!(diagnosis.contains(&Block::Bullet(
            "Eosinophils: 450 cells/uL (January 15, 2024)".into()
        )));

        let history = blocks(&letter, SectionKind::TreatmentHistory);
        assert!(history.contains(&Block::Bullet(
            "High-dose ICS (June 1, 2023): Inadequate control".into()
        )));
        assert_eq!(
            history.last(),
            Some(&Block::Paragraph("Biologic therapy is indicated.".into()))
        );
    }

    #[test]
    fn test_lists_omitted_when_empty() {
        let mut draft = full_draft();
        draft.diagnosis_mut().lab_results = Default::default();
        let letter = render_letter(&draft);
        assert!(!blocks(&letter, SectionKind::Diagnosis)
            .iter()
            .any(|b| matches!(b, Block::Bullet(_) | Block::Strong(_))));
    }

    #[test]
    fn test_empty_dates_render_blank() {
        let mut draft = full_draft();
        draft.letter_date = Some(String::new());
        draft.diagnosis_mut().lab_results = vec![LabResult {
            id: EntryId::from("l2"),
            date: String::new(),
            test: "CRP".into(),
            result: "3".into(),
            unit: "mg/L".into(),
        }]
        .into();
        let letter = render_letter(&draft);
        assert_eq!(letter.date, "");
        assert!(blocks(&letter, SectionKind::Diagnosis)
            .contains(&Block::Bullet("CRP: 3 mg/L ()".into())));
        assert!(!letter.to_plain_text().contains("Invalid"));
    }

    #[test]
    fn test_empty_draft_renders() {
        let letter = render_letter(&DraftLetter::default());
        assert_eq!(letter.sections.len(), 8);
        assert!(blocks(&letter, SectionKind::InsuranceAddress).is_empty());
        assert!(blocks(&letter, SectionKind::Closing)
            .contains(&Block::Line("NPI: ".into())));
    }

    #[test]
    fn test_final_rationale_keeps_line_breaks() {
        let letter = render_letter(&full_draft());
        assert!(blocks(&letter, SectionKind::MedicalNecessity)
            .contains(&Block::Paragraph("Line one\nLine two".into())));
        assert!(letter.to_plain_text().contains("Line one\nLine two"));
        assert!(letter.to_markdown().contains("Line one  \nLine two"));
    }

    #[test]
    fn test_closing_signature() {
        let text = render_letter(&full_draft()).to_plain_text();
        assert!(text.contains(CLOSING_MESSAGE));
        assert!(text.contains("Sincerely,\nMD John Doe\nNPI: 1234567890\nMedical Center\n(555) 123-4567"));
    }

    #[test]
    fn test_markdown_escapes_free_text() {
        let mut draft = full_draft();
        draft.introduction = Some("# not a heading\n---".into());
        let markdown = render_letter(&draft).to_markdown();
        assert!(markdown.contains(r"\# not a heading"));
        assert!(markdown.contains(r"\---"));
        assert!(markdown.starts_with("# Letter of Medical Necessity\n"));
    }

    #[test]
    fn test_template_introduction_scenario() {
        let mut selection = TemplateSelection::new("1");
        let token = selection.begin_load();
        selection.resolve(
            token,
            Ok(vec![Template {
                id: "T".into(),
                intro: "Dear Sir".into(),
                ..Default::default()
            }]),
        );

        let mut store = DraftStore::new();
        store.set_step(1).unwrap();
        selection.select(&mut store, "T").unwrap();
        assert!(FinalReview::use_template_introduction(&mut store));

        let letter = render_letter(store.letter());
        assert_eq!(
            blocks(&letter, SectionKind::Introduction),
            vec![Block::Paragraph("Dear Sir".into())]
        );
    }

    #[test]
    fn test_join_words_skips_blanks() {
        assert_eq!(join_words(&["MD", "", " John ", "Doe"]), "MD John Doe");
        assert_eq!(join_words(&["", " "]), "");
    }
}

//! The single traversal both pipeline directions are built on.
//!
//! `translatable_fields` walks a loaded coach in a fixed order and returns
//! one `(UnitId, FieldRef)` pair per translatable field. Extraction reads
//! each field through [`FieldRef::get`]; the merger writes through
//! [`FieldRef::set`]. Both sides iterate the same list, so their identifier
//! sequences cannot drift apart — if they did, valid translations would
//! silently be reported as misses.

use coachloc_coach_xml::{AnswerOption, Coach, Question};
use coachloc_core::{attrs, IdScheme, UnitId};

/// Index-addressed accessor for one translatable leaf field of a coach.
///
/// A `FieldRef` is only meaningful for the coach it was derived from; the
/// indices point into that document's question/option/entry lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef {
    ReadableName,
    Description,
    QuestionText { q: usize },
    QuestionIntroduction { q: usize },
    QuestionInfotext { q: usize },
    QuestionReadMore { q: usize },
    QuestionInstruction { q: usize },
    OptionText { q: usize, o: usize },
    OptionShort { q: usize, o: usize },
    OptionComment { q: usize, o: usize },
    DictionaryValue { e: usize },
}

fn question(coach: &Coach, q: usize) -> Option<&Question> {
    coach.questions.as_ref().and_then(|qs| qs.question.get(q))
}

fn question_mut(coach: &mut Coach, q: usize) -> Option<&mut Question> {
    coach.questions.as_mut().and_then(|qs| qs.question.get_mut(q))
}

fn option(coach: &Coach, q: usize, o: usize) -> Option<&AnswerOption> {
    question(coach, q)
        .and_then(|qq| qq.options.as_ref())
        .and_then(|os| os.option.get(o))
}

fn option_mut(coach: &mut Coach, q: usize, o: usize) -> Option<&mut AnswerOption> {
    question_mut(coach, q)
        .and_then(|qq| qq.options.as_mut())
        .and_then(|os| os.option.get_mut(o))
}

impl FieldRef {
    /// Current value of the field, `None` when the node is absent.
    pub fn get<'a>(&self, coach: &'a Coach) -> Option<&'a str> {
        match *self {
            FieldRef::ReadableName => Some(&coach.readable_name),
            FieldRef::Description => Some(&coach.description),
            FieldRef::QuestionText { q } => question(coach, q).map(|qq| qq.text.as_str()),
            FieldRef::QuestionIntroduction { q } => {
                question(coach, q).and_then(|qq| qq.introduction.as_deref())
            }
            FieldRef::QuestionInfotext { q } => {
                question(coach, q).and_then(|qq| qq.infotext.as_deref())
            }
            FieldRef::QuestionReadMore { q } => {
                question(coach, q).and_then(|qq| qq.read_more.as_deref())
            }
            FieldRef::QuestionInstruction { q } => question(coach, q)
                .and_then(|qq| qq.instruction.as_ref())
                .map(|i| i.text.as_str()),
            FieldRef::OptionText { q, o } => option(coach, q, o).and_then(|oo| oo.text.as_deref()),
            FieldRef::OptionShort { q, o } => option(coach, q, o).and_then(|oo| oo.short.as_deref()),
            FieldRef::OptionComment { q, o } => {
                option(coach, q, o).and_then(|oo| oo.comment.as_deref())
            }
            FieldRef::DictionaryValue { e } => coach
                .dictionary
                .as_ref()
                .and_then(|d| d.entry.get(e))
                .map(|en| en.value.as_str()),
        }
    }

    /// Overwrite the field. A reference whose node is absent is left alone.
    pub fn set(&self, coach: &mut Coach, value: String) {
        match *self {
            FieldRef::ReadableName => coach.readable_name = value,
            FieldRef::Description => coach.description = value,
            FieldRef::QuestionText { q } => {
                if let Some(qq) = question_mut(coach, q) {
                    qq.text = value;
                }
            }
            FieldRef::QuestionIntroduction { q } => {
                if let Some(qq) = question_mut(coach, q) {
                    qq.introduction = Some(value);
                }
            }
            FieldRef::QuestionInfotext { q } => {
                if let Some(qq) = question_mut(coach, q) {
                    qq.infotext = Some(value);
                }
            }
            FieldRef::QuestionReadMore { q } => {
                if let Some(qq) = question_mut(coach, q) {
                    qq.read_more = Some(value);
                }
            }
            FieldRef::QuestionInstruction { q } => {
                if let Some(i) = question_mut(coach, q).and_then(|qq| qq.instruction.as_mut()) {
                    i.text = value;
                }
            }
            FieldRef::OptionText { q, o } => {
                if let Some(oo) = option_mut(coach, q, o) {
                    oo.text = Some(value);
                }
            }
            FieldRef::OptionShort { q, o } => {
                if let Some(oo) = option_mut(coach, q, o) {
                    oo.short = Some(value);
                }
            }
            FieldRef::OptionComment { q, o } => {
                if let Some(oo) = option_mut(coach, q, o) {
                    oo.comment = Some(value);
                }
            }
            FieldRef::DictionaryValue { e } => {
                if let Some(en) = coach.dictionary.as_mut().and_then(|d| d.entry.get_mut(e)) {
                    en.value = value;
                }
            }
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).unwrap_or("").is_empty()
}

/// Ordered list of translatable fields of `coach`.
///
/// Root readable-name and description are always listed, even when blank, as
/// are question texts and dictionary values. Option text/short/comment, the
/// question introduction/infotext/read-more and the instruction text are
/// listed only when non-blank. The dictionary is skipped when the scheme has
/// no dictionary branch.
pub fn translatable_fields(coach: &Coach, scheme: &IdScheme) -> Vec<(UnitId, FieldRef)> {
    let mut fields = vec![
        (
            UnitId::attr(attrs::COACH_READABLE_NAME),
            FieldRef::ReadableName,
        ),
        (
            UnitId::attr(attrs::COACH_DESCRIPTION),
            FieldRef::Description,
        ),
    ];

    if let Some(questions) = coach.questions.as_ref() {
        for (q, qst) in questions.question.iter().enumerate() {
            fields.push((
                UnitId::question(attrs::QST_TEXT, &qst.id),
                FieldRef::QuestionText { q },
            ));

            if let Some(options) = qst.options.as_ref() {
                for (o, opt) in options.option.iter().enumerate() {
                    if !is_blank(opt.text.as_deref()) {
                        fields.push((
                            UnitId::option(attrs::OPT_TEXT, &qst.id, &opt.id),
                            FieldRef::OptionText { q, o },
                        ));
                    }
                    if !is_blank(opt.short.as_deref()) {
                        fields.push((
                            UnitId::option(attrs::OPT_SHORT, &qst.id, &opt.id),
                            FieldRef::OptionShort { q, o },
                        ));
                    }
                    if !is_blank(opt.comment.as_deref()) {
                        fields.push((
                            UnitId::option(attrs::OPT_COMMENT, &qst.id, &opt.id),
                            FieldRef::OptionComment { q, o },
                        ));
                    }
                }
            }

            if !is_blank(qst.introduction.as_deref()) {
                fields.push((
                    UnitId::question(attrs::QST_INTRODUCTION, &qst.id),
                    FieldRef::QuestionIntroduction { q },
                ));
            }
            if !is_blank(qst.infotext.as_deref()) {
                fields.push((
                    UnitId::question(attrs::QST_INFOTEXT, &qst.id),
                    FieldRef::QuestionInfotext { q },
                ));
            }
            if !is_blank(qst.read_more.as_deref()) {
                fields.push((
                    UnitId::question(attrs::QST_READ_MORE, &qst.id),
                    FieldRef::QuestionReadMore { q },
                ));
            }
            if let Some(instruction) = qst.instruction.as_ref() {
                if !instruction.text.trim().is_empty() {
                    fields.push((
                        UnitId::question(attrs::QST_INSTRUCTION, &qst.id),
                        FieldRef::QuestionInstruction { q },
                    ));
                }
            }
        }
    }

    if scheme.supports_dictionary {
        if let Some(dictionary) = coach.dictionary.as_ref() {
            for (e, entry) in dictionary.entry.iter().enumerate() {
                fields.push((
                    UnitId::dictionary(attrs::DK_TEXT, &entry.key),
                    FieldRef::DictionaryValue { e },
                ));
            }
        }
    }

    fields
}

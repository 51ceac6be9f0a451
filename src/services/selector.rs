use crate::debug_if_enabled;
use crate::model::{matches_any, Descriptor, WindowRecord};
use std::fmt;

/// Что нужно сделать по итогам выбора
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RunCommand(String),
    FocusWindow(WindowRecord),
    NoOp,
}

impl Action {
    /// Запустить команду описания, если она есть; иначе ничего не делать
    fn launch(descriptor: &Descriptor) -> Self {
        match descriptor.command() {
            Some(command) => Action::RunCommand(command.to_string()),
            None => Action::NoOp,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::RunCommand(command) => write!(f, "запуск `{}`", command),
            Action::FocusWindow(window) => write!(f, "фокус на {}", window),
            Action::NoOp => write!(f, "ничего не делать"),
        }
    }
}

/// Режим выбора кандидатов
#[derive(Debug, Clone, Copy)]
pub enum SelectionMode<'a> {
    /// Окна, подходящие под описание
    Matching,
    /// "Прочие" окна: не подходящие ни под одно настроенное описание
    Others { known: &'a [Descriptor] },
}

/// Выбор между запуском, фокусом и переключением по кругу.
///
/// Чистая функция от запроса, согласованного MRU списка и окна в фокусе.
/// Порядок проверок в [`Selector::decide`] важен: каждая следующая
/// рассчитывает на то, что предыдущие не сработали.
pub struct Selector<'a> {
    descriptor: &'a Descriptor,
    mode: SelectionMode<'a>,
    ignore: &'a [Descriptor],
}

impl<'a> Selector<'a> {
    pub fn new(descriptor: &'a Descriptor) -> Self {
        Self {
            descriptor,
            mode: SelectionMode::Matching,
            ignore: &[],
        }
    }

    pub fn others(descriptor: &'a Descriptor, known: &'a [Descriptor]) -> Self {
        Self {
            descriptor,
            mode: SelectionMode::Others { known },
            ignore: &[],
        }
    }

    pub fn with_ignore(mut self, ignore: &'a [Descriptor]) -> Self {
        self.ignore = ignore;
        self
    }

    /// Выбрать действие.
    ///
    /// `mru` должен быть уже согласован с живыми окнами (см.
    /// [`crate::services::mru_store::reconcile`]), поэтому пустой `mru`
    /// означает, что открытых окон нет.
    pub fn decide(&self, mru: &[WindowRecord], focused: Option<&WindowRecord>) -> Action {
        let others_mode = matches!(self.mode, SelectionMode::Others { .. });

        // Описание без ограничений: просто команда запуска
        if !others_mode && !self.descriptor.has_constraints() {
            return Action::launch(self.descriptor);
        }

        if mru.is_empty() {
            return Action::launch(self.descriptor);
        }

        let candidates = self.candidates(mru);
        debug_if_enabled!("Кандидатов для выбора: {}", candidates.len());

        if candidates.is_empty() {
            return Action::launch(self.descriptor);
        }

        let focused = match focused {
            Some(window) if candidates.contains(&window) => window,
            // Приложение открыто, но не в фокусе: самое недавнее его окно
            _ => return Action::FocusWindow(candidates[0].clone()),
        };

        if candidates.len() == 1 {
            return Action::NoOp;
        }

        let unvisited = unvisited(&candidates, mru);
        let target = match unvisited.first() {
            Some(window) => *window,
            None => candidates[candidates.len() - 1],
        };

        assert_ne!(target, focused, "выбрано окно, которое уже в фокусе");
        Action::FocusWindow(target.clone())
    }

    fn candidates<'w>(&self, mru: &'w [WindowRecord]) -> Vec<&'w WindowRecord> {
        mru.iter()
            .filter(|window| match self.mode {
                SelectionMode::Matching => self.descriptor.matches(window),
                SelectionMode::Others { known } => !matches_any(window, known),
            })
            .filter(|window| !matches_any(window, self.ignore))
            .collect()
    }
}

/// Кандидаты, которые ещё не посещены в текущем цикле.
///
/// Посещёнными считаются окна-кандидаты, идущие непрерывной серией в самом
/// начале MRU списка. Порядок результата совпадает с порядком `candidates`.
fn unvisited<'w>(candidates: &[&'w WindowRecord], mru: &[WindowRecord]) -> Vec<&'w WindowRecord> {
    let visited: Vec<&WindowRecord> = mru
        .iter()
        .take_while(|window| candidates.iter().any(|candidate| *candidate == *window))
        .collect();

    candidates
        .iter()
        .copied()
        .filter(|window| !visited.iter().any(|seen| *seen == *window))
        .collect()
}

use crate::core::choice::{ChoiceMenu, Decision};
use crate::core::progress::Progress;
use crate::domain::model::{Venue, VenueTable};
use crate::domain::ports::{ListApi, Storage};
use crate::utils::error::{RefileError, Result};
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Ready,
    Processing,
    Completed,
    Quit,
    Interrupted,
    Failed,
}

/// How the decision loop ended. Progress is persisted for every variant.
#[derive(Debug)]
pub enum RunOutcome {
    Completed,
    QuitEarly,
    Interrupted,
    Failed(RefileError),
}

impl RunOutcome {
    fn state(&self) -> RunState {
        match self {
            RunOutcome::Completed => RunState::Completed,
            RunOutcome::QuitEarly => RunState::Quit,
            RunOutcome::Interrupted => RunState::Interrupted,
            RunOutcome::Failed(_) => RunState::Failed,
        }
    }
}

enum Step {
    Next,
    Quit,
}

/// Where the two progress sets live.
#[derive(Debug, Clone, Copy)]
pub struct ProgressFiles<'p> {
    pub categorized: &'p str,
    pub skipped: &'p str,
}

/// One interactive pass over the venues not yet handled.
pub struct MigrationRun<'a, A: ListApi + ?Sized, R, W> {
    api: &'a A,
    menu: ChoiceMenu,
    queue: Vec<Venue>,
    progress: Progress,
    input: Lines<R>,
    output: W,
    state: RunState,
}

impl<'a, A, R, W> MigrationRun<'a, A, R, W>
where
    A: ListApi + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// The queue is `venues` minus everything already in `progress`.
    pub fn new(
        api: &'a A,
        menu: ChoiceMenu,
        venues: &VenueTable,
        progress: Progress,
        input: R,
        output: W,
    ) -> Self {
        let queue = venues.excluding(&progress.handled());
        tracing::info!(
            "🗂️ {} of {} venues left to categorize",
            queue.len(),
            venues.len()
        );

        Self {
            api,
            menu,
            queue,
            progress,
            input: input.lines(),
            output,
            state: RunState::Ready,
        }
    }

    pub fn queue(&self) -> &[Venue] {
        &self.queue
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Runs the loop until the queue is exhausted, the user quits, `shutdown`
    /// resolves, or a call fails; then persists progress.
    ///
    /// A failure is returned as `Err` after progress has been saved.
    pub async fn run<S, F>(
        &mut self,
        storage: &S,
        files: ProgressFiles<'_>,
        shutdown: F,
    ) -> Result<RunOutcome>
    where
        S: Storage,
        F: Future<Output = ()>,
    {
        let outcome = tokio::select! {
            outcome = self.process_queue() => outcome,
            _ = shutdown => RunOutcome::Interrupted,
        };
        self.state = outcome.state();

        let persisted = self
            .progress
            .persist(storage, files.categorized, files.skipped)
            .await;

        match outcome {
            RunOutcome::Failed(err) => {
                if let Some(reset) = err.rate_limit_reset_time() {
                    let reset = reset.format("%Y-%m-%d %H:%M:%S");
                    tracing::warn!("⏳ Over rate limit, next reset time is: {}", reset);
                    let _ = writeln!(self.output, "Over rate limit, next reset time is: {}", reset);
                }
                if let Err(persist_err) = persisted {
                    tracing::error!("❌ Could not save progress: {}", persist_err);
                }
                Err(err)
            }
            other => {
                persisted?;
                match &other {
                    RunOutcome::Completed => writeln!(self.output, "Completed!")?,
                    RunOutcome::Interrupted => {
                        writeln!(self.output, "\nInterrupted, progress saved.")?
                    }
                    _ => {}
                }
                Ok(other)
            }
        }
    }

    async fn process_queue(&mut self) -> RunOutcome {
        self.state = RunState::Processing;
        let total = self.queue.len();

        for index in 0..total {
            let venue = self.queue[index].clone();
            match self.process_venue(index + 1, total, &venue).await {
                Ok(Step::Next) => {}
                Ok(Step::Quit) => return RunOutcome::QuitEarly,
                Err(err) => {
                    tracing::error!("❌ Stopped at {}: {}", venue.id, err);
                    return RunOutcome::Failed(err);
                }
            }
        }

        RunOutcome::Completed
    }

    async fn process_venue(&mut self, position: usize, total: usize, venue: &Venue) -> Result<Step> {
        writeln!(self.output, "Processing venue #{}/{}", position, total)?;
        writeln!(self.output, "{}", venue_summary(venue))?;
        writeln!(self.output, "\nChoices:")?;
        writeln!(self.output, "{}", self.menu.render())?;
        writeln!(self.output, "s) Skip?")?;
        writeln!(self.output, "q) Quit?")?;
        writeln!(self.output, "\nWhat would you like to do with this venue?")?;

        loop {
            write!(self.output, "--> ")?;
            self.output.flush()?;

            let Some(line) = self.input.next_line().await? else {
                tracing::info!("Input closed, treating as quit");
                writeln!(self.output, "\nExiting and saving!")?;
                return Ok(Step::Quit);
            };

            match self.menu.parse(&line) {
                Decision::RetryInput(problem) => {
                    tracing::debug!("Rejected input {:?}: {:?}", line, problem);
                    writeln!(self.output, "{}", problem.guidance())?;
                }
                Decision::Skip => {
                    writeln!(self.output, "Skipping over {}...", venue.display_name())?;
                    self.progress.mark_skipped(&venue.id);
                    writeln!(self.output)?;
                    return Ok(Step::Next);
                }
                Decision::Quit => {
                    writeln!(self.output, "Exiting and saving!")?;
                    return Ok(Step::Quit);
                }
                Decision::Proceed(list_id) => {
                    let list_name = self.menu.name_of(&list_id).unwrap_or(list_id.as_str()).to_string();
                    writeln!(
                        self.output,
                        "Adding {} to list {}",
                        venue.display_name(),
                        list_name
                    )?;
                    self.api.add_to_list(&list_id, &venue.id).await?;
                    self.progress.mark_categorized(&venue.id);
                    tracing::debug!("Filed {} into {}", venue.id, list_id);
                    writeln!(self.output)?;
                    return Ok(Step::Next);
                }
            }
        }
    }
}

pub fn venue_summary(venue: &Venue) -> String {
    format!(
        "Categorizing: {}\n\nCategory: {}\nCity, State: {}\nPrice: {}\nRating: {}\nURL: {}",
        venue.display_name(),
        venue.category.as_deref().unwrap_or("None"),
        venue.city_state,
        venue.price,
        venue
            .rating
            .map(|r| format!("{:?}", r))
            .unwrap_or_else(|| "None".to_string()),
        venue.url()
    )
}

//! Job posting service: posting, editing, closing and the public listing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tracing::info;
use uuid::Uuid;

use common::{bounded, AppError, AppResult, OptionExt};
use domain::{CallerIdentity, Job, JobFilter, JobPage, JobUpdate, NewJob, PageRequest, UserRole};

use crate::repository::JobRepository;

/// Reload-and-merge rounds before a contended update gives up.
const MAX_UPDATE_ATTEMPTS: usize = 3;

/// Job service trait for dependency injection.
#[async_trait]
pub trait JobService: Send + Sync {
    /// Post a new open job owned by the calling employer
    async fn post_job(&self, caller: CallerIdentity, draft: NewJob) -> AppResult<Job>;

    /// Job detail, whatever its status
    async fn get_job(&self, job_id: Uuid) -> AppResult<Job>;

    /// One page of open jobs, newest first
    async fn list_jobs(&self, filter: JobFilter, page: PageRequest) -> AppResult<JobPage>;

    /// Partial update by the owning employer
    async fn update_job(
        &self,
        caller: CallerIdentity,
        job_id: Uuid,
        update: JobUpdate,
    ) -> AppResult<Job>;

    /// Close a job. Closing a closed job succeeds and changes nothing.
    async fn close_job(&self, caller: CallerIdentity, job_id: Uuid) -> AppResult<Job>;
}

/// Concrete implementation of JobService.
pub struct JobManager {
    jobs: Arc<dyn JobRepository>,
    timeout: Duration,
}

impl JobManager {
    pub fn new(jobs: Arc<dyn JobRepository>, timeout: Duration) -> Self {
        Self { jobs, timeout }
    }

    async fn load(&self, job_id: Uuid) -> AppResult<Job> {
        self.jobs.find_by_id(job_id).await?.ok_or_not_found()
    }
}

#[async_trait]
impl JobService for JobManager {
    async fn post_job(&self, caller: CallerIdentity, draft: NewJob) -> AppResult<Job> {
        bounded(self.timeout, "post_job", async {
            caller.require_role(UserRole::Employer)?;

            let job = self.jobs.create(Job::post(caller.user_id, draft)?).await?;
            info!(job_id = %job.id, owner_id = %job.owner_id, "Job posted");
            Ok(job)
        })
        .await
    }

    async fn get_job(&self, job_id: Uuid) -> AppResult<Job> {
        bounded(self.timeout, "get_job", self.load(job_id)).await
    }

    async fn list_jobs(&self, filter: JobFilter, page: PageRequest) -> AppResult<JobPage> {
        bounded(self.timeout, "list_jobs", async {
            let cursor = page.cursor()?;
            let limit = page.limit();

            // One extra row tells whether another page follows.
            let rows = self.jobs.list_open(&filter, cursor, limit + 1).await?;
            Ok(JobPage::from_rows(rows, limit))
        })
        .await
    }

    async fn update_job(
        &self,
        caller: CallerIdentity,
        job_id: Uuid,
        update: JobUpdate,
    ) -> AppResult<Job> {
        bounded(self.timeout, "update_job", async {
            for _ in 0..MAX_UPDATE_ATTEMPTS {
                let mut job = self.load(job_id).await?;
                if job.owner_id != caller.user_id {
                    return Err(AppError::Forbidden);
                }

                let expected = job.updated_at;
                job.apply(update.clone())?;
                if self.jobs.update(job.clone(), expected).await? {
                    return Ok(job);
                }
                // Written concurrently; merge again over the fresh row.
            }
            Err(AppError::conflict("job was modified concurrently, retry"))
        })
        .await
    }

    async fn close_job(&self, caller: CallerIdentity, job_id: Uuid) -> AppResult<Job> {
        bounded(self.timeout, "close_job", async {
            let mut job = self.load(job_id).await?;
            caller.require_manage(job.owner_id)?;

            if !job.close() {
                return Ok(job);
            }

            if self.jobs.close(job_id, job.updated_at).await? {
                info!(%job_id, closed_by = %caller.user_id, "Job closed");
                Ok(job)
            } else {
                // Closed concurrently; report the stored row.
                self.load(job_id).await
            }
        })
        .await
    }
}

/// Lazily walk every open job matching `filter`, fetching `page_size` jobs
/// per round trip. Pages are only requested as the stream is polled.
pub fn stream_open_jobs(
    jobs: Arc<dyn JobService>,
    filter: JobFilter,
    page_size: u64,
) -> BoxStream<'static, AppResult<Job>> {
    stream::try_unfold(Some(None), move |cursor| {
        fetch_page(jobs.clone(), filter.clone(), page_size, cursor)
    })
    .map_ok(|page| stream::iter(page.into_iter().map(Ok::<Job, AppError>)))
    .try_flatten()
    .boxed()
}

/// `cursor` is `None` once the listing is exhausted and `Some(None)` before
/// the first page.
async fn fetch_page(
    jobs: Arc<dyn JobService>,
    filter: JobFilter,
    page_size: u64,
    cursor: Option<Option<String>>,
) -> AppResult<Option<(Vec<Job>, Option<Option<String>>)>> {
    let Some(cursor) = cursor else {
        return Ok(None);
    };

    let page = jobs
        .list_jobs(filter, PageRequest::new(Some(page_size), cursor))
        .await?;
    if page.data.is_empty() {
        return Ok(None);
    }

    Ok(Some((page.data, page.next_cursor.map(Some))))
}

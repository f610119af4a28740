use std::{collections::HashSet, sync::Arc};

use crate::{
    auth::Caller,
    clock::Clock,
    errors::{AppError, AppResult},
    models::domain::goal::{collect_questions, GoalStatus, GoalType},
    models::domain::user::UserRole,
    models::domain::{Goal, GoalSubmission},
    models::dto::request::{CreateGoalRequest, ReviewSubmissionRequest, SubmitGoalRequest},
    models::dto::response::{
        GoalDetailResponse, GoalResponse, StudentGoalResponse, SubmissionDashboard,
        SubmittedEntry,
    },
    repositories::{GoalRepository, GoalSubmissionRepository},
    services::{profile_service::ProfileService, quiz_grading::grade_quiz},
};

pub struct GoalService {
    goals: Arc<dyn GoalRepository>,
    submissions: Arc<dyn GoalSubmissionRepository>,
    profile_service: Arc<ProfileService>,
    clock: Arc<dyn Clock>,
}

impl GoalService {
    pub fn new(
        goals: Arc<dyn GoalRepository>,
        submissions: Arc<dyn GoalSubmissionRepository>,
        profile_service: Arc<ProfileService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            goals,
            submissions,
            profile_service,
            clock,
        }
    }

    /// Creates a goal. An empty student list assigns every student registered right now;
    /// later registrations are not added.
    pub async fn create_goal(
        &self,
        caller: &Caller,
        request: CreateGoalRequest,
    ) -> AppResult<GoalResponse> {
        caller.require_faculty()?;

        let mut goal = Goal::new(
            request.title.trim(),
            request.description.trim(),
            request.goal_type,
            &caller.user_id,
            request.start_date,
            request.due_date,
        )?;
        goal.resource_link = request.resource_link.filter(|l| !l.trim().is_empty());
        goal.resource_file = request.resource_file.filter(|f| !f.trim().is_empty());

        if goal.goal_type == GoalType::Quiz {
            goal.questions = collect_questions(&request.questions)?;
            if goal.questions.is_empty() {
                return Err(AppError::ValidationError(
                    "A quiz needs at least one question".to_string(),
                ));
            }
        }

        goal.assigned_to = self.resolve_assignees(request.student_ids).await?;

        let goal = self.goals.create(goal).await?;
        log::info!(
            "Goal {} created by {} for {} students",
            goal.id,
            caller.username,
            goal.assigned_to.len()
        );
        Ok(GoalResponse::for_owner(&goal, self.clock.today()))
    }

    async fn resolve_assignees(&self, requested: Vec<String>) -> AppResult<Vec<String>> {
        if requested.is_empty() {
            return self.profile_service.student_ids().await;
        }

        let mut seen = HashSet::new();
        let mut assignees = Vec::new();
        for id in requested {
            let id = id.trim().to_string();
            if id.is_empty() || !seen.insert(id.clone()) {
                continue;
            }
            self.profile_service
                .require_role(&id, UserRole::Student, "Student")
                .await?;
            assignees.push(id);
        }
        Ok(assignees)
    }

    pub async fn list_for_faculty(&self, caller: &Caller) -> AppResult<Vec<GoalResponse>> {
        caller.require_faculty()?;
        let today = self.clock.today();

        let goals = self.goals.find_by_owner(&caller.user_id).await?;
        Ok(goals
            .iter()
            .map(|g| GoalResponse::for_owner(g, today))
            .collect())
    }

    /// Assigned goals with the caller's own submission. Persists the overdue transition
    /// for every past-due active goal before reading.
    pub async fn list_for_student(&self, caller: &Caller) -> AppResult<Vec<StudentGoalResponse>> {
        caller.require_student()?;
        let today = self.clock.today();

        let flipped = self
            .goals
            .mark_overdue_for_student(&caller.user_id, today)
            .await?;
        if flipped > 0 {
            log::info!("Marked {} goals overdue for {}", flipped, caller.user_id);
        }

        let goals = self.goals.find_assigned_to(&caller.user_id).await?;
        let mut views = Vec::with_capacity(goals.len());
        for goal in &goals {
            let submission = self
                .submissions
                .find_by_goal_and_student(&goal.id, &caller.user_id)
                .await?;
            views.push(StudentGoalResponse {
                goal: GoalResponse::for_student(goal, today),
                submission,
            });
        }
        Ok(views)
    }

    pub async fn get_goal(&self, caller: &Caller, goal_id: &str) -> AppResult<GoalDetailResponse> {
        let today = self.clock.today();
        let goal = self.visible_goal(caller, goal_id).await?;

        if goal.is_owned_by(&caller.user_id) {
            return Ok(GoalDetailResponse::Owner(GoalResponse::for_owner(&goal, today)));
        }

        if goal.needs_overdue_transition(today) {
            self.goals.mark_overdue(&goal.id, today).await?;
        }
        let submission = self
            .submissions
            .find_by_goal_and_student(&goal.id, &caller.user_id)
            .await?;
        Ok(GoalDetailResponse::Student(StudentGoalResponse {
            goal: GoalResponse::for_student(&goal, today),
            submission,
        }))
    }

    /// One-shot: a second attempt is a conflict and leaves the first untouched.
    pub async fn submit(
        &self,
        caller: &Caller,
        goal_id: &str,
        request: SubmitGoalRequest,
    ) -> AppResult<GoalSubmission> {
        caller.require_student()?;
        let goal = self.visible_goal(caller, goal_id).await?;

        if self
            .submissions
            .find_by_goal_and_student(&goal.id, &caller.user_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "You have already submitted this goal".to_string(),
            ));
        }

        let mut submission = GoalSubmission::new(&goal.id, &caller.user_id);
        submission.note = request.note.filter(|n| !n.trim().is_empty());
        submission.file_url = request.file_url.filter(|f| !f.trim().is_empty());

        if goal.is_quiz() {
            let graded = grade_quiz(&goal, &request.answers)?;
            submission.answers = graded.answers;
            submission.quiz_score = Some(graded.score);
            submission.quiz_total = Some(graded.total);
        }

        // the unique (goal_id, student_id) index rejects a racing duplicate
        let submission = self.submissions.create(submission).await?;
        log::info!("Submission {} for goal {} by {}", submission.id, goal.id, caller.user_id);
        Ok(submission)
    }

    pub async fn review(
        &self,
        caller: &Caller,
        goal_id: &str,
        submission_id: &str,
        request: ReviewSubmissionRequest,
    ) -> AppResult<GoalSubmission> {
        let goal = self.owned_goal(caller, goal_id).await?;

        if !request.status.is_review_outcome() {
            return Err(AppError::ValidationError(
                "Review status must be reviewed, approved or rejected".to_string(),
            ));
        }

        let submission = self
            .submissions
            .find_by_id(submission_id)
            .await?
            .filter(|s| s.goal_id == goal.id)
            .ok_or_else(|| AppError::not_found("Submission", submission_id))?;

        let feedback = request.feedback.filter(|f| !f.trim().is_empty());
        self.submissions
            .update_review(&submission.id, request.status, feedback)
            .await
    }

    /// Assigned students split into submitted and not yet submitted.
    pub async fn submissions_dashboard(
        &self,
        caller: &Caller,
        goal_id: &str,
    ) -> AppResult<SubmissionDashboard> {
        let goal = self.owned_goal(caller, goal_id).await?;
        let submissions = self.submissions.find_by_goal(&goal.id).await?;

        let submitted_ids: HashSet<&str> =
            submissions.iter().map(|s| s.student_id.as_str()).collect();
        let pending: Vec<String> = goal
            .assigned_to
            .iter()
            .filter(|id| !submitted_ids.contains(id.as_str()))
            .cloned()
            .collect();

        let submitter_ids: Vec<String> = submissions.iter().map(|s| s.student_id.clone()).collect();
        let submitters = self.profile_service.summaries(&submitter_ids).await?;
        let submitted = submissions
            .into_iter()
            .filter_map(|submission| {
                submitters
                    .iter()
                    .find(|s| s.id == submission.student_id)
                    .map(|student| SubmittedEntry {
                        student: student.clone(),
                        submission,
                    })
            })
            .collect();

        Ok(SubmissionDashboard {
            goal: GoalResponse::for_owner(&goal, self.clock.today()),
            submitted,
            not_submitted: self.profile_service.summaries(&pending).await?,
        })
    }

    pub async fn complete(&self, caller: &Caller, goal_id: &str) -> AppResult<GoalResponse> {
        let mut goal = self.owned_goal(caller, goal_id).await?;

        if goal.status == GoalStatus::Completed {
            return Err(AppError::Conflict("Goal is already completed".to_string()));
        }
        self.goals.set_status(&goal.id, GoalStatus::Completed).await?;
        goal.status = GoalStatus::Completed;

        Ok(GoalResponse::for_owner(&goal, self.clock.today()))
    }

    /// Deletes the goal, then its submissions. Submissions left behind by a
    /// failed cleanup are unreachable and only logged.
    pub async fn delete(&self, caller: &Caller, goal_id: &str) -> AppResult<()> {
        let goal = self.owned_goal(caller, goal_id).await?;

        self.goals.delete(&goal.id).await?;
        match self.submissions.delete_by_goal(&goal.id).await {
            Ok(removed) => log::info!("Goal {} deleted with {} submissions", goal.id, removed),
            Err(e) => log::warn!("Goal {} deleted but its submissions were kept: {}", goal.id, e),
        }
        Ok(())
    }

    /// A goal the faculty caller owns; anything else reads as not found.
    async fn owned_goal(&self, caller: &Caller, goal_id: &str) -> AppResult<Goal> {
        caller.require_faculty()?;
        self.goals
            .find_by_id(goal_id)
            .await?
            .filter(|g| g.is_owned_by(&caller.user_id))
            .ok_or_else(|| AppError::not_found("Goal", goal_id))
    }

    /// Owners see their goals, students see goals assigned to them.
    async fn visible_goal(&self, caller: &Caller, goal_id: &str) -> AppResult<Goal> {
        self.goals
            .find_by_id(goal_id)
            .await?
            .filter(|g| {
                (caller.is_faculty() && g.is_owned_by(&caller.user_id))
                    || (caller.is_student() && g.is_assigned_to(&caller.user_id))
            })
            .ok_or_else(|| AppError::not_found("Goal", goal_id))
    }
}

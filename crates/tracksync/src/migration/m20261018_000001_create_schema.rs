//! Initial migration: projects, issues and the issue activity log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_projects(manager).await?;
        self.create_issues(manager).await?;
        self.create_issue_activities(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IssueActivities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Issues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_projects(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::Description).text().null())
                    .col(ColumnDef::new(Projects::GithubRepo).string().null())
                    .col(
                        ColumnDef::new(Projects::GithubSyncedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Projects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_issues(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Issues::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Issues::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Issues::ProjectId).uuid().not_null())
                    // Content
                    .col(ColumnDef::new(Issues::Title).string().not_null())
                    .col(ColumnDef::new(Issues::Description).text().null())
                    .col(
                        ColumnDef::new(Issues::IssueType)
                            .string()
                            .not_null()
                            .default("TASK"),
                    )
                    .col(
                        ColumnDef::new(Issues::Priority)
                            .string()
                            .not_null()
                            .default("MEDIUM"),
                    )
                    .col(
                        ColumnDef::new(Issues::Status)
                            .string()
                            .not_null()
                            .default("BACKLOG"),
                    )
                    .col(
                        ColumnDef::new(Issues::Labels)
                            .json()
                            .not_null()
                            .default(Expr::cust("'[]'")),
                    )
                    .col(
                        ColumnDef::new(Issues::Assignees)
                            .json()
                            .not_null()
                            .default(Expr::cust("'[]'")),
                    )
                    // Remote link
                    .col(ColumnDef::new(Issues::GithubIssueNumber).big_integer().null())
                    .col(ColumnDef::new(Issues::GithubState).string().null())
                    // Timestamps
                    .col(
                        ColumnDef::new(Issues::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Issues::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issues_project")
                            .from(Issues::Table, Issues::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One local issue per remote number within a project (NULLs are distinct)
        manager
            .create_index(
                Index::create()
                    .name("idx_issues_project_github_number")
                    .table(Issues::Table)
                    .col(Issues::ProjectId)
                    .col(Issues::GithubIssueNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_issues_project_created")
                    .table(Issues::Table)
                    .col(Issues::ProjectId)
                    .col(Issues::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_issue_activities(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IssueActivities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IssueActivities::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IssueActivities::IssueId).uuid().not_null())
                    .col(ColumnDef::new(IssueActivities::Action).string().not_null())
                    .col(ColumnDef::new(IssueActivities::Field).string().null())
                    .col(ColumnDef::new(IssueActivities::OldValue).text().null())
                    .col(ColumnDef::new(IssueActivities::NewValue).text().null())
                    .col(
                        ColumnDef::new(IssueActivities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_activities_issue")
                            .from(IssueActivities::Table, IssueActivities::IssueId)
                            .to(Issues::Table, Issues::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_issue_activities_issue")
                    .table(IssueActivities::Table)
                    .col(IssueActivities::IssueId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    Name,
    Description,
    GithubRepo,
    GithubSyncedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Issues {
    Table,
    Id,
    ProjectId,
    Title,
    Description,
    IssueType,
    Priority,
    Status,
    Labels,
    Assignees,
    GithubIssueNumber,
    GithubState,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum IssueActivities {
    Table,
    Id,
    IssueId,
    Action,
    Field,
    OldValue,
    NewValue,
    CreatedAt,
}

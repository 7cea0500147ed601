//! The tracker operation table.
//!
//! One macro invocation below describes every operation once. From it come
//! both the [`OperationDescriptor`] list the invoker dispatches on and the
//! typed forwarder methods on [`TrackerClient`], so the two cannot drift.
//! Operations in the `session` section take the session token as their
//! first wire parameter.

use std::path::Path;
use std::sync::Arc;

use ir::{xsd, FaultKind, OperationDescriptor};
use registry::{local, Bindings, LocalValue, OperationCatalog, RegistryError, TypeRegistry};
use types::*;

use crate::service::{CallError, ReturnShape, Session, TrackerClient, WireTyped};

macro_rules! tracker_operations {
    (
        public {
            $(
                $(#[doc = $pdoc:literal])*
                $pfn:ident => $pop:literal ( $($parg:ident : $pty:ty),* ) -> $pret:ty
                    [ $($pfault:ident),* ];
            )*
        }
        session {
            $(
                $(#[doc = $sdoc:literal])*
                $sfn:ident => $sop:literal ( $($sarg:ident : $sty:ty),* ) -> $sret:ty
                    [ $($sfault:ident),* ];
            )*
        }
    ) => {
        /// Descriptors of every tracker operation.
        pub fn tracker_descriptors() -> Vec<OperationDescriptor> {
            vec![
                $({
                    let mut descriptor = OperationDescriptor::new($pop)
                        .describe(concat!($($pdoc),*).trim())
                        $(.param(stringify!($parg), <$pty as WireTyped>::wire_type(), Some(stringify!($pty))))*
                        $(.fault(FaultKind::$pfault))*;
                    descriptor.returns = <$pret as ReturnShape>::return_spec(stringify!($pret));
                    descriptor
                },)*
                $({
                    let mut descriptor = OperationDescriptor::new($sop)
                        .describe(concat!($($sdoc),*).trim())
                        .param("token", xsd::string(), Some("String"))
                        $(.param(stringify!($sarg), <$sty as WireTyped>::wire_type(), Some(stringify!($sty))))*
                        $(.fault(FaultKind::$sfault))*;
                    descriptor.returns = <$sret as ReturnShape>::return_spec(stringify!($sret));
                    descriptor
                },)*
            ]
        }

        impl TrackerClient {
            $(
                $(#[doc = $pdoc])*
                pub async fn $pfn(&self, $($parg: $pty),*) -> Result<$pret, CallError> {
                    let args: Vec<LocalValue> = vec![$(local($parg)),*];
                    let result = self.invoker.invoke($pop, args).await?;
                    <$pret as ReturnShape>::from_result($pop, result)
                }
            )*
            $(
                $(#[doc = $sdoc])*
                pub async fn $sfn(&self, session: &Session, $($sarg: $sty),*) -> Result<$sret, CallError> {
                    let args: Vec<LocalValue> = vec![local(session.token().to_string()), $(local($sarg)),*];
                    let result = self.invoker.invoke($sop, args).await?;
                    <$sret as ReturnShape>::from_result($sop, result)
                }
            )*
        }
    };
}

tracker_operations! {
    public {
        /// Authenticate and return a session token.
        login => "login"(username: String, password: String) -> String
            [AuthenticationFailed, RemoteError];

        /// Server version and clock.
        get_server_info => "getServerInfo"() -> RemoteServerInfo [];
    }
    session {
        /// Invalidate the session token.
        logout => "logout"() -> bool [];

        /// Fetch a user by login name, or `None` if there is no such user.
        get_user => "getUser"(username: String) -> Option<RemoteUser>
            [AuthenticationFailed, PermissionDenied];
        /// Create a user account.
        create_user => "createUser"(username: String, password: String, full_name: String, email: String) -> RemoteUser
            [PermissionDenied, ValidationFailed, AuthenticationFailed, RemoteError];
        /// Delete a user account.
        delete_user => "deleteUser"(username: String) -> ()
            [PermissionDenied, ValidationFailed, AuthenticationFailed, RemoteError];

        /// Fetch a group and its members.
        get_group => "getGroup"(group_name: String) -> Option<RemoteGroup>
            [PermissionDenied, ValidationFailed, AuthenticationFailed, RemoteError];
        /// Create a group with one initial member.
        create_group => "createGroup"(group_name: String, first_user: RemoteUser) -> RemoteGroup
            [PermissionDenied, ValidationFailed, AuthenticationFailed, RemoteError];
        /// Add a user to a group.
        add_user_to_group => "addUserToGroup"(group: RemoteGroup, user: RemoteUser) -> ()
            [PermissionDenied, ValidationFailed, AuthenticationFailed, RemoteError];
        /// Remove a user from a group.
        remove_user_from_group => "removeUserFromGroup"(group: RemoteGroup, user: RemoteUser) -> ()
            [PermissionDenied, ValidationFailed, AuthenticationFailed, RemoteError];
        /// Delete a group, moving its permissions to `swap_group`.
        delete_group => "deleteGroup"(group_name: String, swap_group: String) -> ()
            [PermissionDenied, ValidationFailed, AuthenticationFailed, RemoteError];

        /// Fetch a project by key.
        get_project_by_key => "getProjectByKey"(project_key: String) -> Option<RemoteProject>
            [PermissionDenied, AuthenticationFailed, RemoteError];
        /// All projects, without their permission schemes.
        get_projects_no_schemes => "getProjectsNoSchemes"() -> Vec<RemoteProject>
            [PermissionDenied, AuthenticationFailed, RemoteError];
        /// Create a project.
        create_project => "createProject"(project: RemoteProject) -> RemoteProject
            [PermissionDenied, ValidationFailed, AuthenticationFailed, RemoteError];
        /// Delete a project.
        delete_project => "deleteProject"(project_key: String) -> ()
            [PermissionDenied, AuthenticationFailed, RemoteError];
        /// Versions of a project.
        get_versions => "getVersions"(project_key: String) -> Vec<RemoteVersion>
            [PermissionDenied, AuthenticationFailed, RemoteError];
        /// Components of a project.
        get_components => "getComponents"(project_key: String) -> Vec<RemoteComponent>
            [PermissionDenied, AuthenticationFailed, RemoteError];

        /// Fetch an issue by key.
        get_issue => "getIssue"(issue_key: String) -> Option<RemoteIssue>
            [PermissionDenied, AuthenticationFailed, RemoteError];
        /// Create an issue.
        create_issue => "createIssue"(issue: RemoteIssue) -> RemoteIssue
            [PermissionDenied, ValidationFailed, AuthenticationFailed, RemoteError];
        /// Update fields of an issue.
        update_issue => "updateIssue"(issue_key: String, fields: Vec<RemoteFieldValue>) -> RemoteIssue
            [PermissionDenied, ValidationFailed, AuthenticationFailed, RemoteError];
        /// Delete an issue.
        delete_issue => "deleteIssue"(issue_key: String) -> ()
            [PermissionDenied, AuthenticationFailed, RemoteError];
        /// Run a JQL search.
        get_issues_from_jql_search => "getIssuesFromJqlSearch"(jql: String, max_results: i32) -> Vec<RemoteIssue>
            [RemoteError];
        /// Comment on an issue.
        add_comment => "addComment"(issue_key: String, comment: RemoteComment) -> ()
            [PermissionDenied, AuthenticationFailed, RemoteError];
        /// Comments on an issue.
        get_comments => "getComments"(issue_key: String) -> Vec<RemoteComment>
            [PermissionDenied, AuthenticationFailed, RemoteError];
        /// Run a workflow transition, updating `fields` on the way.
        progress_workflow_action => "progressWorkflowAction"(issue_key: String, action_id: String, fields: Vec<RemoteFieldValue>) -> RemoteIssue
            [RemoteError];

        /// Log work and shrink the remaining estimate accordingly.
        add_worklog_and_auto_adjust_remaining_estimate => "addWorklogAndAutoAdjustRemainingEstimate"(issue_key: String, worklog: RemoteWorklog) -> RemoteWorklog
            [PermissionDenied, ValidationFailed, RemoteError];
        /// Work logged against an issue.
        get_worklogs => "getWorklogs"(issue_key: String) -> Vec<RemoteWorklog>
            [PermissionDenied, ValidationFailed, RemoteError];
        /// Delete a worklog and grow the remaining estimate accordingly.
        delete_worklog_and_auto_adjust_remaining_estimate => "deleteWorklogAndAutoAdjustRemainingEstimate"(worklog_id: String) -> ()
            [PermissionDenied, ValidationFailed, RemoteError];

        /// Every permission the server knows.
        get_all_permissions => "getAllPermissions"() -> Vec<RemotePermission>
            [PermissionDenied, RemoteError];
        /// All permission schemes.
        get_permission_schemes => "getPermissionSchemes"() -> Vec<RemotePermissionScheme>
            [PermissionDenied, RemoteError];
        /// Grant `permission` to `entity` within `scheme`.
        add_permission_to => "addPermissionTo"(scheme: RemotePermissionScheme, permission: RemotePermission, entity: RemoteUser) -> RemotePermissionScheme
            [PermissionDenied, RemoteError];

        /// Issue priorities.
        get_priorities => "getPriorities"() -> Vec<RemotePriority>
            [PermissionDenied, RemoteError];
        /// Workflow statuses.
        get_statuses => "getStatuses"() -> Vec<RemoteStatus>
            [PermissionDenied, RemoteError];
        /// Issue types.
        get_issue_types => "getIssueTypes"() -> Vec<RemoteIssueType>
            [PermissionDenied, RemoteError];
    }
}

/// Register the schema primitives and every tracker entity.
pub fn tracker_types() -> Result<TypeRegistry, RegistryError> {
    let mut builder = TypeRegistry::builder();
    builder
        .with_primitives()?
        .register::<RemoteUser>(<RemoteUser as Entity>::wire_type())?
        .register::<RemoteGroup>(<RemoteGroup as Entity>::wire_type())?
        .register::<RemoteProject>(<RemoteProject as Entity>::wire_type())?
        .register::<RemoteVersion>(<RemoteVersion as Entity>::wire_type())?
        .register::<RemoteComponent>(<RemoteComponent as Entity>::wire_type())?
        .register::<RemoteIssue>(<RemoteIssue as Entity>::wire_type())?
        .register::<RemoteComment>(<RemoteComment as Entity>::wire_type())?
        .register::<RemoteFieldValue>(<RemoteFieldValue as Entity>::wire_type())?
        .register::<RemoteCustomFieldValue>(<RemoteCustomFieldValue as Entity>::wire_type())?
        .register::<RemoteWorklog>(<RemoteWorklog as Entity>::wire_type())?
        .register::<RemotePermission>(<RemotePermission as Entity>::wire_type())?
        .register::<RemotePermissionMapping>(<RemotePermissionMapping as Entity>::wire_type())?
        .register::<RemotePermissionScheme>(<RemotePermissionScheme as Entity>::wire_type())?
        .register::<RemoteServerInfo>(<RemoteServerInfo as Entity>::wire_type())?
        .register::<RemoteStatus>(<RemoteStatus as Entity>::wire_type())?
        .register::<RemotePriority>(<RemotePriority as Entity>::wire_type())?
        .register::<RemoteIssueType>(<RemoteIssueType as Entity>::wire_type())?;
    Ok(builder.build())
}

/// The built-in tracker catalog.
pub fn tracker_catalog() -> Result<OperationCatalog, RegistryError> {
    OperationCatalog::from_descriptors(tracker_descriptors())
}

/// Validated bindings for the built-in catalog.
pub fn tracker_bindings() -> Result<Arc<Bindings>, RegistryError> {
    Bindings::new(tracker_catalog()?, tracker_types()?)
}

/// Validated bindings for a catalog file, checked against the tracker types.
pub fn bindings_from_file(path: &Path) -> Result<Arc<Bindings>, RegistryError> {
    Bindings::new(OperationCatalog::from_file(path)?, tracker_types()?)
}

pub use super::ot_policy_applications::Entity as OtPolicyApplications;

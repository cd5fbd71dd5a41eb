use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum PricingRules {
    Table,
    Id,
    Name,
    LessonType,
    Subject,
    MinDurationHours,
    MaxDurationHours,
    BasePricePerHour,
    TutorShare,
    VolumeDiscounts,
    Priority,
    IsActive,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TutorPricingOverrides {
    Table,
    Id,
    TutorId,
    PricingRuleId,
    CustomPricePerHour,
    CustomTutorShare,
    IsActive,
    ValidFrom,
    ValidUntil,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PricingCalculations {
    Table,
    Id,
    BookingId,
    LessonType,
    Subject,
    DurationHours,
    TutorId,
    AppliedPricingRuleId,
    AppliedOverrideId,
    BasePricePerHour,
    TotalBasePrice,
    VolumeDiscountRate,
    FinalTotalPrice,
    TutorEarnings,
    PlatformFee,
    TutorShareApplied,
    CalculatedAt,
}

#[derive(DeriveIden)]
enum Packages {
    Table,
    Id,
    TutorId,
    Name,
    Subject,
    TotalHours,
    Price,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PackagePurchases {
    Table,
    Id,
    StudentId,
    PackageId,
    HoursUsed,
    HoursRemaining,
    IsActive,
    ExpiryDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
    StudentId,
    TutorId,
    PackagePurchaseId,
    StartTime,
    EndTime,
    Subject,
    Notes,
    Status,
    CalculatedDuration,
    CalculatedPrice,
    TutorEarnings,
    PlatformFee,
    PricingRuleApplied,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Slots {
    Table,
    Id,
    TutorId,
    Date,
    StartTime,
    EndTime,
    IsAvailable,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AdminPackageAssignments {
    Table,
    Id,
    StudentId,
    TutorId,
    PackageId,
    AssignedByAdminId,
    CustomTotalHours,
    CustomPrice,
    CustomExpiryDate,
    Status,
    HoursUsed,
    HoursRemaining,
    AutoActivateOnPayment,
    AdminNotes,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AdminPayments {
    Table,
    Id,
    PackageAssignmentId,
    StudentId,
    ProcessedByAdminId,
    Amount,
    PaymentMethod,
    PaymentDate,
    Status,
    ReferenceNumber,
    ConfirmedByAdminId,
    ConfirmationDate,
    AdminNotes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("lesson_type"))
                    .values([
                        Alias::new("after_school"),
                        Alias::new("one_to_one"),
                        Alias::new("group"),
                        Alias::new("online"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("booking_status"))
                    .values([
                        Alias::new("pending"),
                        Alias::new("confirmed"),
                        Alias::new("completed"),
                        Alias::new("cancelled"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("package_assignment_status"))
                    .values([
                        Alias::new("draft"),
                        Alias::new("assigned"),
                        Alias::new("active"),
                        Alias::new("suspended"),
                        Alias::new("completed"),
                        Alias::new("cancelled"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("payment_status"))
                    .values([
                        Alias::new("pending"),
                        Alias::new("completed"),
                        Alias::new("cancelled"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("payment_method"))
                    .values([
                        Alias::new("bank_transfer"),
                        Alias::new("cash"),
                        Alias::new("check"),
                        Alias::new("card_offline"),
                        Alias::new("other"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PricingRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PricingRules::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PricingRules::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PricingRules::LessonType)
                            .custom(Alias::new("lesson_type"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(PricingRules::Subject).string().not_null())
                    .col(
                        ColumnDef::new(PricingRules::MinDurationHours)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(PricingRules::MaxDurationHours).integer())
                    .col(
                        ColumnDef::new(PricingRules::BasePricePerHour)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingRules::TutorShare)
                            .decimal_len(5, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PricingRules::VolumeDiscounts).json_binary())
                    .col(
                        ColumnDef::new(PricingRules::Priority)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(PricingRules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(PricingRules::Description).text())
                    .col(
                        ColumnDef::new(PricingRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PricingRules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_pricing_rules_lookup")
                    .table(PricingRules::Table)
                    .col(PricingRules::LessonType)
                    .col(PricingRules::Subject)
                    .col(PricingRules::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TutorPricingOverrides::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TutorPricingOverrides::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TutorPricingOverrides::TutorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TutorPricingOverrides::PricingRuleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TutorPricingOverrides::CustomPricePerHour).decimal_len(10, 2))
                    .col(ColumnDef::new(TutorPricingOverrides::CustomTutorShare).decimal_len(5, 4))
                    .col(
                        ColumnDef::new(TutorPricingOverrides::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(TutorPricingOverrides::ValidFrom).timestamp_with_time_zone())
                    .col(ColumnDef::new(TutorPricingOverrides::ValidUntil).timestamp_with_time_zone())
                    .col(ColumnDef::new(TutorPricingOverrides::Notes).text())
                    .col(
                        ColumnDef::new(TutorPricingOverrides::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TutorPricingOverrides::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_override_pricing_rule")
                            .from(TutorPricingOverrides::Table, TutorPricingOverrides::PricingRuleId)
                            .to(PricingRules::Table, PricingRules::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_tutor_overrides_lookup")
                    .table(TutorPricingOverrides::Table)
                    .col(TutorPricingOverrides::TutorId)
                    .col(TutorPricingOverrides::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Packages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Packages::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Packages::TutorId).big_integer().not_null())
                    .col(ColumnDef::new(Packages::Name).string().not_null())
                    .col(ColumnDef::new(Packages::Subject).string().not_null())
                    .col(ColumnDef::new(Packages::TotalHours).integer().not_null())
                    .col(ColumnDef::new(Packages::Price).decimal_len(10, 2).not_null())
                    .col(
                        ColumnDef::new(Packages::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Packages::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Packages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PackagePurchases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PackagePurchases::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PackagePurchases::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PackagePurchases::PackageId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PackagePurchases::HoursUsed)
                            .decimal_len(6, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PackagePurchases::HoursRemaining)
                            .decimal_len(6, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PackagePurchases::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(PackagePurchases::ExpiryDate).date())
                    .col(
                        ColumnDef::new(PackagePurchases::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PackagePurchases::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_package")
                            .from(PackagePurchases::Table, PackagePurchases::PackageId)
                            .to(Packages::Table, Packages::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_package_purchases_student")
                    .table(PackagePurchases::Table)
                    .col(PackagePurchases::StudentId)
                    .col(PackagePurchases::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::TutorId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Bookings::PackagePurchaseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::Subject).string().not_null())
                    .col(ColumnDef::new(Bookings::Notes).text())
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .custom(Alias::new("booking_status"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::CalculatedDuration).decimal_len(6, 2))
                    .col(ColumnDef::new(Bookings::CalculatedPrice).decimal_len(10, 2))
                    .col(ColumnDef::new(Bookings::TutorEarnings).decimal_len(10, 2))
                    .col(ColumnDef::new(Bookings::PlatformFee).decimal_len(10, 2))
                    .col(ColumnDef::new(Bookings::PricingRuleApplied).string())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_purchase")
                            .from(Bookings::Table, Bookings::PackagePurchaseId)
                            .to(PackagePurchases::Table, PackagePurchases::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_tutor_window")
                    .table(Bookings::Table)
                    .col(Bookings::TutorId)
                    .col(Bookings::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PricingCalculations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PricingCalculations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PricingCalculations::BookingId).big_integer())
                    .col(
                        ColumnDef::new(PricingCalculations::LessonType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingCalculations::Subject)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingCalculations::DurationHours)
                            .decimal_len(6, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingCalculations::TutorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PricingCalculations::AppliedPricingRuleId).big_integer())
                    .col(ColumnDef::new(PricingCalculations::AppliedOverrideId).big_integer())
                    .col(
                        ColumnDef::new(PricingCalculations::BasePricePerHour)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingCalculations::TotalBasePrice)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingCalculations::VolumeDiscountRate)
                            .decimal_len(5, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingCalculations::FinalTotalPrice)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingCalculations::TutorEarnings)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingCalculations::PlatformFee)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingCalculations::TutorShareApplied)
                            .decimal_len(5, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingCalculations::CalculatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_pricing_calculations_booking")
                    .table(PricingCalculations::Table)
                    .col(PricingCalculations::BookingId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Slots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Slots::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Slots::TutorId).big_integer().not_null())
                    .col(ColumnDef::new(Slots::Date).date().not_null())
                    .col(ColumnDef::new(Slots::StartTime).time().not_null())
                    .col(ColumnDef::new(Slots::EndTime).time().not_null())
                    .col(
                        ColumnDef::new(Slots::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Slots::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Slots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_slots_tutor_date")
                    .table(Slots::Table)
                    .col(Slots::TutorId)
                    .col(Slots::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminPackageAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminPackageAssignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminPackageAssignments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminPackageAssignments::TutorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminPackageAssignments::PackageId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminPackageAssignments::AssignedByAdminId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdminPackageAssignments::CustomTotalHours).integer())
                    .col(ColumnDef::new(AdminPackageAssignments::CustomPrice).decimal_len(10, 2))
                    .col(ColumnDef::new(AdminPackageAssignments::CustomExpiryDate).date())
                    .col(
                        ColumnDef::new(AdminPackageAssignments::Status)
                            .custom(Alias::new("package_assignment_status"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminPackageAssignments::HoursUsed)
                            .decimal_len(6, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AdminPackageAssignments::HoursRemaining)
                            .decimal_len(6, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminPackageAssignments::AutoActivateOnPayment)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(AdminPackageAssignments::AdminNotes).text())
                    .col(ColumnDef::new(AdminPackageAssignments::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(AdminPackageAssignments::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AdminPackageAssignments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignment_package")
                            .from(AdminPackageAssignments::Table, AdminPackageAssignments::PackageId)
                            .to(Packages::Table, Packages::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_assignments_business_key")
                    .table(AdminPackageAssignments::Table)
                    .col(AdminPackageAssignments::StudentId)
                    .col(AdminPackageAssignments::TutorId)
                    .col(AdminPackageAssignments::PackageId)
                    .col(AdminPackageAssignments::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminPayments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminPayments::PackageAssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminPayments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminPayments::ProcessedByAdminId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminPayments::Amount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminPayments::PaymentMethod)
                            .custom(Alias::new("payment_method"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdminPayments::PaymentDate).date())
                    .col(
                        ColumnDef::new(AdminPayments::Status)
                            .custom(Alias::new("payment_status"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdminPayments::ReferenceNumber).string())
                    .col(ColumnDef::new(AdminPayments::ConfirmedByAdminId).big_integer())
                    .col(ColumnDef::new(AdminPayments::ConfirmationDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(AdminPayments::AdminNotes).text())
                    .col(
                        ColumnDef::new(AdminPayments::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AdminPayments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_assignment")
                            .from(AdminPayments::Table, AdminPayments::PackageAssignmentId)
                            .to(AdminPackageAssignments::Table, AdminPackageAssignments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Partial unique index: at most one completed payment per non-null
        // reference number. sea-query has no WHERE clause on indexes, so raw SQL.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX uq_admin_payments_completed_reference \
                 ON admin_payments (reference_number) \
                 WHERE status = 'completed' AND reference_number IS NOT NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdminPackageAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Slots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PricingCalculations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PackagePurchases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Packages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TutorPricingOverrides::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PricingRules::Table).to_owned())
            .await?;
        for name in [
            "payment_method",
            "payment_status",
            "package_assignment_status",
            "booking_status",
            "lesson_type",
        ] {
            manager
                .drop_type(Type::drop().name(Alias::new(name)).to_owned())
                .await?;
        }
        Ok(())
    }
}
